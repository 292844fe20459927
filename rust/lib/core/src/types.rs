use chrono::{DateTime, Utc};

/// Width of a zero-padded nanosecond timestamp. Keeps lexicographic key
/// order equal to chronological order.
const TIME_ID_WIDTH: usize = 20;

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Time-derived ID: the instant's Unix nanoseconds, zero-padded so that
/// string order matches time order.
pub fn time_id(at: DateTime<Utc>) -> String {
    let nanos = at.timestamp_nanos_opt().unwrap_or_default();
    format!("{:0width$}", nanos, width = TIME_ID_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
    }

    #[test]
    fn time_ids_sort_chronologically() {
        let early = DateTime::from_timestamp(9, 0).unwrap();
        let late = DateTime::from_timestamp(1_700_000_000, 5).unwrap();
        let (a, b) = (time_id(early), time_id(late));
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(b, "01700000000000000005");
    }
}
