//! Nested name lists
//!
//! Repository entries and import requests can be given as any mix of
//! single names and (arbitrarily nested) lists of names. Everything is
//! flattened into a linear, ordered sequence before use.

/// A single name or a nested list of names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameList {
    /// A single name
    Name(String),

    /// An ordered list of names or further lists
    List(Vec<NameList>),
}

impl NameList {
    /// Build a list from anything convertible into names
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NameList>,
    {
        NameList::List(items.into_iter().map(Into::into).collect())
    }

    /// Flatten into a linear sequence, preserving order
    pub fn flatten(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            NameList::Name(name) => out.push(name.clone()),
            NameList::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

/// Flatten a slice of name lists into one sequence
pub fn flatten(lists: &[NameList]) -> Vec<String> {
    let mut out = Vec::new();
    for list in lists {
        list.flatten_into(&mut out);
    }
    out
}

impl From<&str> for NameList {
    fn from(name: &str) -> Self {
        NameList::Name(name.to_string())
    }
}

impl From<String> for NameList {
    fn from(name: String) -> Self {
        NameList::Name(name)
    }
}

impl From<&String> for NameList {
    fn from(name: &String) -> Self {
        NameList::Name(name.clone())
    }
}

impl<T: Into<NameList>> From<Vec<T>> for NameList {
    fn from(items: Vec<T>) -> Self {
        NameList::list(items)
    }
}

impl<T: Into<NameList>, const N: usize> From<[T; N]> for NameList {
    fn from(items: [T; N]) -> Self {
        NameList::list(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_single_name() {
        assert_eq!(NameList::from("lib").flatten(), vec!["lib"]);
    }

    #[test]
    fn test_flatten_nested_lists() {
        // 'a', 'b', ['c', 'd'], ['h', 'i', ['j'], 'abc'], 'f'
        let names = NameList::List(vec![
            "a".into(),
            "b".into(),
            NameList::from(["c", "d"]),
            NameList::List(vec![
                "h".into(),
                "i".into(),
                NameList::from(["j"]),
                "abc".into(),
            ]),
            "f".into(),
        ]);

        assert_eq!(
            names.flatten(),
            vec!["a", "b", "c", "d", "h", "i", "j", "abc", "f"]
        );
    }

    #[test]
    fn test_flatten_empty_list() {
        let names = NameList::List(vec![NameList::List(vec![])]);
        assert!(names.flatten().is_empty());
    }

    #[test]
    fn test_flatten_slice() {
        let lists = [NameList::from("x"), NameList::from(vec!["y", "z"])];
        assert_eq!(flatten(&lists), vec!["x", "y", "z"]);
    }
}
