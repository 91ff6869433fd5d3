//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing an enquiry submission.
#[derive(Clone, Copy, Debug)]
pub struct Submission;
