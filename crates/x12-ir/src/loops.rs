//! Loop nodes
//!
//! Loops are the interior of a transaction tree: a schema-assigned id, the
//! segments that belong directly to the loop, and child loops in document
//! order.

use crate::segment::Segment;
use serde::{Deserialize, Serialize};

/// A schema-defined grouping of segments that may repeat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loop {
    /// Loop identifier from the schema (e.g. "2000A", "2300"); "ROOT" for
    /// the transaction root
    pub id: String,
    /// Segments directly in this loop, document order
    pub segments: Vec<Segment>,
    /// Child loops, document order
    pub loops: Vec<Loop>,
}

impl Loop {
    /// Create an empty loop with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            segments: Vec::new(),
            loops: Vec::new(),
        }
    }

    /// First direct segment with the given id.
    #[must_use]
    pub fn segment(&self, segment_id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == segment_id)
    }

    /// All direct segments with the given id.
    #[must_use]
    pub fn segments_by_id(&self, segment_id: &str) -> Vec<&Segment> {
        self.segments.iter().filter(|s| s.id == segment_id).collect()
    }

    /// First direct child loop with the given id.
    #[must_use]
    pub fn loop_by_id(&self, loop_id: &str) -> Option<&Loop> {
        self.loops.iter().find(|l| l.id == loop_id)
    }

    /// All direct child loops with the given id.
    #[must_use]
    pub fn loops_by_id(&self, loop_id: &str) -> Vec<&Loop> {
        self.loops.iter().filter(|l| l.id == loop_id).collect()
    }

    /// Navigate a slash-separated loop path (e.g. `"2000A/2010AA"`).
    #[must_use]
    pub fn loop_by_path(&self, path: &str) -> Option<&Loop> {
        let mut current = self;
        for part in path.split('/') {
            current = current.loop_by_id(part)?;
        }
        Some(current)
    }

    /// True if the loop directly contains a segment with the given id.
    #[must_use]
    pub fn has_segment(&self, segment_id: &str) -> bool {
        self.segments.iter().any(|s| s.id == segment_id)
    }

    /// First segment with the given id anywhere in this subtree.
    #[must_use]
    pub fn find_segment(&self, segment_id: &str) -> Option<&Segment> {
        self.segment(segment_id)
            .or_else(|| self.loops.iter().find_map(|l| l.find_segment(segment_id)))
    }

    /// Depth-first walk over every segment in the subtree, document order.
    pub fn walk_segments<'a>(&'a self, out: &mut Vec<&'a Segment>) {
        out.extend(self.segments.iter());
        for child in &self.loops {
            child.walk_segments(out);
        }
    }

    /// Total segment count in the subtree.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len() + self.loops.iter().map(Loop::segment_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Loop {
        let mut root = Loop::new("ROOT");
        root.segments.push(Segment::from_values("BHT", vec!["0019"]));

        let mut billing = Loop::new("2000A");
        billing
            .segments
            .push(Segment::from_values("HL", vec!["1", "", "20", "1"]));

        let mut name = Loop::new("2010AA");
        name.segments
            .push(Segment::from_values("NM1", vec!["85", "2", "CLINIC"]));
        billing.loops.push(name);

        root.loops.push(billing);
        root
    }

    #[test]
    fn test_path_navigation() {
        let root = sample_tree();
        let nm1_loop = root.loop_by_path("2000A/2010AA").unwrap();
        assert_eq!(nm1_loop.segment("NM1").unwrap().value(3), "CLINIC");
        assert!(root.loop_by_path("2000A/2300").is_none());
    }

    #[test]
    fn test_find_segment_descends() {
        let root = sample_tree();
        assert!(root.find_segment("NM1").is_some());
        assert!(root.find_segment("CLM").is_none());
    }

    #[test]
    fn test_walk_preserves_document_order() {
        let root = sample_tree();
        let mut segs = Vec::new();
        root.walk_segments(&mut segs);
        let ids: Vec<&str> = segs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["BHT", "HL", "NM1"]);
        assert_eq!(root.segment_count(), 3);
    }
}
