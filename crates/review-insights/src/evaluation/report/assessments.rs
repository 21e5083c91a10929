use crate::evaluation::domain::{BusinessReviews, Review};
use crate::evaluation::fields::{format_timestamp, review_timestamp};

use super::views::{AssessmentEntry, AssessmentListView};

/// Lists a business's assessments in upstream order, keeping the pending/completed split.
pub fn assessment_list(reviews: &BusinessReviews) -> AssessmentListView {
    AssessmentListView {
        pending: reviews.pending.iter().map(assessment_entry).collect(),
        completed: reviews.completed.iter().map(assessment_entry).collect(),
    }
}

fn assessment_entry(review: &Review) -> AssessmentEntry {
    let timestamp = review_timestamp(review);
    AssessmentEntry {
        id: review.id.clone(),
        name: review.name.clone(),
        status: review.status,
        status_label: review.status.label(),
        stats: review.stats,
        date_field: timestamp.field(),
        date: format_timestamp(timestamp),
    }
}
