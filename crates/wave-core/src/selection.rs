//! Selection and drag handle types.

use crate::wave::WaveId;

/// What the operator currently has selected.
///
/// Point and segment selections address points by index within their wave.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Wave { wave_id: WaveId },
    Point { wave_id: WaveId, index: usize },
    /// Two adjacent points of the same wave.
    Segment { wave_id: WaveId, a: usize, b: usize },
}

impl Selection {
    /// Build a segment selection, rejecting non-adjacent indices.
    pub fn segment(wave_id: WaveId, a: usize, b: usize) -> Option<Self> {
        (a.abs_diff(b) == 1).then_some(Selection::Segment { wave_id, a, b })
    }

    /// The wave this selection belongs to, if any.
    pub fn wave_id(&self) -> Option<&WaveId> {
        match self {
            Selection::None => None,
            Selection::Wave { wave_id }
            | Selection::Point { wave_id, .. }
            | Selection::Segment { wave_id, .. } => Some(wave_id),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

/// The point being relocated during a pointer-down/drag/up cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragHandle {
    pub wave_id: WaveId,
    pub point_index: usize,
}

impl DragHandle {
    pub fn new(wave_id: WaveId, point_index: usize) -> Self {
        Self { wave_id, point_index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_requires_adjacent() {
        let id = WaveId::from("w1");
        assert!(Selection::segment(id.clone(), 1, 2).is_some());
        assert!(Selection::segment(id.clone(), 2, 1).is_some());
        assert!(Selection::segment(id.clone(), 0, 2).is_none());
        assert!(Selection::segment(id, 1, 1).is_none());
    }

    #[test]
    fn test_wave_id() {
        let id = WaveId::from("w1");
        assert_eq!(Selection::None.wave_id(), None);
        assert_eq!(Selection::Point { wave_id: id.clone(), index: 0 }.wave_id(), Some(&id));
        assert_eq!(Selection::Wave { wave_id: id.clone() }.wave_id(), Some(&id));
    }
}
