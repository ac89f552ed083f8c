//! Split a candidate into highlighted and plain runs from a match's index list

/// A run of consecutive chars sharing the same highlight state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// Group `text` into runs, highlighting the char positions in `indices`.
///
/// Indices are ascending char positions; out-of-range ones are ignored.
pub fn segments(text: &str, indices: &[usize]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut marks = indices.iter().copied().peekable();

    for (i, c) in text.chars().enumerate() {
        while marks.next_if(|&m| m < i).is_some() {}
        let highlighted = marks.next_if_eq(&i).is_some();

        match segments.last_mut() {
            Some(last) if last.highlighted == highlighted => last.text.push(c),
            _ => segments.push(Segment {
                text: c.to_string(),
                highlighted,
            }),
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, highlighted: bool) -> Segment {
        Segment {
            text: text.to_string(),
            highlighted,
        }
    }

    #[test]
    fn test_no_indices() {
        assert_eq!(segments("Firefox", &[]), vec![seg("Firefox", false)]);
    }

    #[test]
    fn test_acronym_highlight() {
        assert_eq!(
            segments("Flow Launcher", &[0, 5]),
            vec![seg("F", true), seg("low ", false), seg("L", true), seg("auncher", false)]
        );
    }

    #[test]
    fn test_prefix_highlight() {
        assert_eq!(
            segments("Windows", &[0, 1, 2]),
            vec![seg("Win", true), seg("dows", false)]
        );
    }

    #[test]
    fn test_out_of_range_ignored() {
        assert_eq!(segments("ab", &[1, 9]), vec![seg("a", false), seg("b", true)]);
    }

    #[test]
    fn test_char_positions() {
        assert_eq!(
            segments("Über", &[0, 1]),
            vec![seg("Üb", true), seg("er", false)]
        );
    }

    #[test]
    fn test_duplicate_indices() {
        assert_eq!(
            segments("abc", &[1, 1, 2]),
            vec![seg("a", false), seg("bc", true)]
        );
    }

    #[test]
    fn test_separated_runs() {
        assert_eq!(
            segments("Notes pa pad", &[0, 1, 2, 3, 9, 10, 11]),
            vec![seg("Note", true), seg("s pa ", false), seg("pad", true)]
        );
    }

    #[test]
    fn test_empty_text() {
        assert!(segments("", &[0]).is_empty());
    }
}
