//! Path-segment tokenization and accessor-name conventions.

/// One leading segment of a navigation path such as `orders[2].lines`.
///
/// Splits on the first dot outside brackets to get `name`/`children`, then
/// peels a trailing `[...]` off the leading segment into `index`.
/// `indexed_name` keeps the pre-split spelling (`orders[2]`). No semantic
/// validation happens here; malformed brackets and empty names surface as
/// lookup failures downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTokenizer {
    name: String,
    index: Option<String>,
    indexed_name: String,
    children: Option<String>,
}

impl PropertyTokenizer {
    pub fn new(path: &str) -> PropertyTokenizer {
        let (head, children) = split_head(path);

        let indexed_name = head.to_string();
        let (name, index) = match head.find('[') {
            Some(open) if head.ends_with(']') => (
                head[..open].to_string(),
                Some(head[open + 1..head.len() - 1].to_string()),
            ),
            _ => (head.to_string(), None),
        };

        PropertyTokenizer {
            name,
            index,
            indexed_name,
            children: children.map(str::to_string),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    pub fn indexed_name(&self) -> &str {
        &self.indexed_name
    }

    pub fn children(&self) -> Option<&str> {
        self.children.as_deref()
    }

    pub fn has_next(&self) -> bool {
        self.children.is_some()
    }
}

/// Split off the leading segment at the first dot that is not inside
/// brackets, so `map[a.b].c` keeps `a.b` intact as an index.
fn split_head(path: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    for (i, ch) in path.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => return (&path[..i], Some(&path[i + 1..])),
            _ => {}
        }
    }
    (path, None)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AccessorKind {
    Getter,
    Setter,
}

/// Map an accessor method name (`getName`, `isActive`, `setName`) to its
/// property name, or `None` for methods that are not accessor-shaped.
pub(crate) fn accessor_property(method: &str) -> Option<(AccessorKind, String)> {
    let (kind, rest) = if let Some(rest) = method.strip_prefix("get") {
        (AccessorKind::Getter, rest)
    } else if let Some(rest) = method.strip_prefix("is") {
        (AccessorKind::Getter, rest)
    } else if let Some(rest) = method.strip_prefix("set") {
        (AccessorKind::Setter, rest)
    } else {
        return None;
    };
    if rest.is_empty() {
        return None;
    }
    Some((kind, decapitalize(rest)))
}

/// Lowercase the leading character unless the name opens with an acronym
/// (`getURL` stays `URL`), following the JavaBeans convention.
fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if let Some(second) = chars.next() {
        if second.is_uppercase() {
            return name.to_string();
        }
    }
    first.to_lowercase().chain(name.chars().skip(1)).collect()
}

/// Case-insensitive property-name comparison; with `use_camel_case`,
/// underscores in the queried name are ignored so `rich_property` finds
/// `richProperty`.
pub(crate) fn property_matches(candidate: &str, queried: &str, use_camel_case: bool) -> bool {
    let queried: String = if use_camel_case {
        queried.chars().filter(|c| *c != '_').collect()
    } else {
        queried.to_string()
    };
    candidate.eq_ignore_ascii_case(&queried)
}
