//! User review append on the in-memory medicine record.
//!
//! Reviews are transient: they live on the current `MedicineRecord` and are
//! gone when the record is replaced or the service restarts.

use chrono::Utc;

use crate::models::{MedicineRecord, Review};

/// Fixed author label for reviews written by the signed-in user.
pub const SELF_AUTHOR: &str = "You";

/// Append a user-authored review to the record.
///
/// Returns `false` without touching the record when the comment is empty or
/// whitespace-only. The rating is clamped to 1..=5 so the stored `Review`
/// invariant holds regardless of caller input; the date is today's calendar
/// date (UTC).
pub fn append_review(record: &mut MedicineRecord, rating: u8, comment: &str) -> bool {
    let comment = comment.trim();
    if comment.is_empty() {
        return false;
    }

    record.reviews.push(Review {
        author: SELF_AUTHOR.to_string(),
        rating: rating.clamp(1, 5),
        comment: comment.to_string(),
        date: Utc::now().date_naive(),
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analysis::seed_reviews;

    fn record_with_seeds() -> MedicineRecord {
        MedicineRecord {
            name: "Panadol".into(),
            generic_name: "Paracetamol".into(),
            description: "Pain reliever.".into(),
            ingredients: vec!["Paracetamol 500mg".into()],
            manufacturer: "GSK".into(),
            dosage: "1-2 tablets every 4-6 hours.".into(),
            side_effects: vec![],
            precautions: vec![],
            educational_video_id: "abc123".into(),
            reviews: seed_reviews(),
        }
    }

    #[test]
    fn empty_comment_is_a_no_op() {
        let mut record = record_with_seeds();
        let before = record.reviews.len();
        assert!(!append_review(&mut record, 4, ""));
        assert!(!append_review(&mut record, 4, "   \t"));
        assert_eq!(record.reviews.len(), before);
    }

    #[test]
    fn valid_review_is_appended() {
        let mut record = record_with_seeds();
        let before = record.reviews.len();
        assert!(append_review(&mut record, 4, "Great"));
        assert_eq!(record.reviews.len(), before + 1);

        let added = record.reviews.last().unwrap();
        assert_eq!(added.rating, 4);
        assert_eq!(added.author, SELF_AUTHOR);
        assert_eq!(added.comment, "Great");
        assert_eq!(added.date, Utc::now().date_naive());
    }

    #[test]
    fn comment_is_trimmed() {
        let mut record = record_with_seeds();
        assert!(append_review(&mut record, 5, "  works well  "));
        assert_eq!(record.reviews.last().unwrap().comment, "works well");
    }

    #[test]
    fn out_of_range_rating_is_clamped() {
        let mut record = record_with_seeds();
        assert!(append_review(&mut record, 0, "too low"));
        assert_eq!(record.reviews.last().unwrap().rating, 1);
        assert!(append_review(&mut record, 9, "too high"));
        assert_eq!(record.reviews.last().unwrap().rating, 5);
    }
}
