//! Reorderable widget layout.
//!
//! An ordered sequence of group identifiers the user can rearrange by drag
//! while edit mode is on. A move is a stable single-element relocation; the
//! UI toolkit's drag machinery sits entirely outside this interface. The
//! order is not persisted.

use crate::widgets::WidgetKind;

/// Move one element from `from` to `to`, keeping every other element's
/// relative order. Out-of-range indices leave the list untouched.
pub fn move_element<T>(list: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= list.len() || to >= list.len() {
        return false;
    }
    if from == to {
        return true;
    }
    let item = list.remove(from);
    list.insert(to, item);
    true
}

#[derive(Debug)]
pub struct Layout {
    order: Vec<WidgetKind>,
    edit_mode: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            order: WidgetKind::ALL.to_vec(),
            edit_mode: false,
        }
    }
}

impl Layout {
    pub fn order(&self) -> &[WidgetKind] {
        &self.order
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.edit_mode = on;
    }

    /// Drag-reorder, rejected outside edit mode. Turning edit mode off
    /// afterwards keeps the new order.
    pub fn move_group(&mut self, from: usize, to: usize) -> bool {
        if !self.edit_mode {
            return false;
        }
        move_element(&mut self.order, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WidgetKind::*;

    #[test]
    fn move_preserves_relative_order_of_the_rest() {
        let mut list = vec!["a", "b", "c", "d", "e"];
        assert!(move_element(&mut list, 1, 3));
        assert_eq!(list, vec!["a", "c", "d", "b", "e"]);

        // And backwards.
        let mut list = vec!["a", "b", "c", "d", "e"];
        assert!(move_element(&mut list, 3, 0));
        assert_eq!(list, vec!["d", "a", "b", "c", "e"]);
    }

    #[test]
    fn moved_element_lands_at_the_drop_index() {
        for from in 0..4 {
            for to in 0..4 {
                let mut list = vec![0, 1, 2, 3];
                assert!(move_element(&mut list, from, to));
                assert_eq!(list[to], from);
                assert_eq!(list.len(), 4);
            }
        }
    }

    #[test]
    fn out_of_range_moves_are_rejected() {
        let mut list = vec![1, 2, 3];
        assert!(!move_element(&mut list, 0, 5));
        assert!(!move_element(&mut list, 7, 0));
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn drag_is_disabled_outside_edit_mode() {
        let mut layout = Layout::default();
        assert!(!layout.move_group(0, 2));
        assert_eq!(layout.order(), WidgetKind::ALL);
    }

    #[test]
    fn leaving_edit_mode_keeps_the_reorder() {
        let mut layout = Layout::default();
        layout.set_edit_mode(true);
        assert!(layout.move_group(0, 2));
        layout.set_edit_mode(false);
        assert_eq!(layout.order(), &[Hotel, Weather, Flight, CityPhoto]);
    }
}
