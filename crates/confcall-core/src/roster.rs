/// Ordered, duplicate-free list of remote participants in view.
///
/// A participant enters the roster once its first video frame is decoded,
/// so the grid only shows tiles with flowing video.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the participant was already present.
    pub fn add(&mut self, uid: &str) -> bool {
        if self.contains(uid) {
            return false;
        }
        self.participants.push(uid.to_string());
        true
    }

    /// Returns false if the participant was not present.
    pub fn remove(&mut self, uid: &str) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p != uid);
        self.participants.len() != before
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.participants.iter().any(|p| p == uid)
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn clear(&mut self) {
        self.participants.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_insertion_order() {
        let mut roster = Roster::new();
        assert!(roster.add("A"));
        assert!(roster.add("B"));
        assert_eq!(roster.participants(), &["A", "B"]);
    }

    #[test]
    fn no_duplicate_participants() {
        let mut roster = Roster::new();
        roster.add("A");
        assert!(!roster.add("A"));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn remove_participant() {
        let mut roster = Roster::new();
        roster.add("A");
        roster.add("B");
        assert!(roster.remove("A"));
        assert!(!roster.contains("A"));
        assert!(roster.contains("B"));
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut roster = Roster::new();
        roster.add("A");
        assert!(!roster.remove("Z"));
        assert_eq!(roster.participants(), &["A"]);
    }

    #[test]
    fn mixed_sequence_tracks_live_members() {
        let mut roster = Roster::new();
        let ops = [
            ("add", "A"),
            ("add", "B"),
            ("add", "A"),
            ("remove", "A"),
            ("add", "C"),
            ("remove", "Z"),
            ("add", "A"),
            ("remove", "B"),
        ];
        let mut expected: Vec<&str> = Vec::new();
        for (op, uid) in ops {
            match op {
                "add" => {
                    roster.add(uid);
                    if !expected.contains(&uid) {
                        expected.push(uid);
                    }
                }
                _ => {
                    roster.remove(uid);
                    expected.retain(|e| *e != uid);
                }
            }
            assert_eq!(roster.participants(), expected.as_slice());
        }
        assert_eq!(roster.participants(), &["C", "A"]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut roster = Roster::new();
        roster.add("A");
        roster.clear();
        assert!(roster.is_empty());
    }
}
