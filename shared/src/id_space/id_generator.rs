use crate::{id_space::{IdRange, IdSpaceError}, ObjectId};

/// Hands out identifiers from one range in strictly increasing order.
///
/// Identifiers are never recycled within a session, so a stale reference can
/// never alias a newer object.
pub struct IdGenerator {
    range: IdRange,
    next: Option<ObjectId>,
}

impl IdGenerator {
    pub fn new(range: IdRange) -> Self {
        Self {
            range,
            next: Some(range.min()),
        }
    }

    /// Starts allocation at `first`, skipping identifiers that are implicitly bound
    pub fn starting_at(range: IdRange, first: ObjectId) -> Result<Self, IdSpaceError> {
        range.validate(first)?;
        Ok(Self {
            range,
            next: Some(first),
        })
    }

    pub fn range(&self) -> IdRange {
        self.range
    }

    pub fn generate(&mut self) -> Result<ObjectId, IdSpaceError> {
        let Some(id) = self.next else {
            return Err(IdSpaceError::Exhausted { range: self.range });
        };
        self.next = if id == self.range.max() {
            None
        } else {
            Some(id + 1)
        };
        Ok(id)
    }

    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}
