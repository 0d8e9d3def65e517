/// Sound ids enabled for random play.
///
/// Kept in the order they were selected; random choice indexes into this
/// order. Ids are never duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    /// Flip membership of `id`. Returns true if it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_is_noop() {
        let mut selection = Selection::default();
        assert!(selection.toggle("A"));
        assert!(!selection.toggle("A"));
        assert!(selection.is_empty());
    }

    #[test]
    fn keeps_selection_order() {
        let mut selection = Selection::default();
        selection.toggle("C");
        selection.toggle("A");
        selection.toggle("B");
        selection.toggle("A");
        assert_eq!(selection.to_vec(), vec!["C", "B"]);
        assert_eq!(selection.get(1), Some("B"));
    }
}
