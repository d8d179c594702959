//! Error taxonomy shared by the school services.

use crate::config::EmptyListPolicy;
use crate::model::enrollment::RelationshipError;
use crate::model::student::{StudentId, StudentValidationError, MAX_STUDENT_AGE, MIN_STUDENT_AGE};
use crate::model::EntityKind;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for school use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Referenced id does not exist.
    NotFound { kind: EntityKind, id: i64 },
    /// Student exists but has no address assigned.
    AddressNotAssigned(StudentId),
    /// A list query found no rows and the empty-list policy is `Error`.
    EmptyList(EntityKind),
    /// Student age outside the accepted range.
    InvalidAge { age: i32 },
    /// Enrollment change attempted on an unsaved entity.
    Relationship(RelationshipError),
    /// Storage contents contradict a relationship invariant.
    InconsistentState(&'static str),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} with ID: {id} could not be found"),
            Self::AddressNotAssigned(student_id) => {
                write!(f, "Student with ID: {student_id} has no address")
            }
            Self::EmptyList(kind) => write!(f, "{kind} list is empty"),
            Self::InvalidAge { age } => write!(
                f,
                "student age must be between {MIN_STUDENT_AGE} and {MAX_STUDENT_AGE}, got {age}"
            ),
            Self::Relationship(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent school data: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Relationship(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Repo(other),
        }
    }
}

impl From<StudentValidationError> for ServiceError {
    fn from(value: StudentValidationError) -> Self {
        match value {
            StudentValidationError::AgeOutOfRange { age } => Self::InvalidAge { age },
        }
    }
}

impl From<RelationshipError> for ServiceError {
    fn from(value: RelationshipError) -> Self {
        Self::Relationship(value)
    }
}

/// Applies the empty-list policy to a freshly loaded list.
pub(crate) fn non_empty<T>(
    policy: EmptyListPolicy,
    kind: EntityKind,
    items: Vec<T>,
) -> ServiceResult<Vec<T>> {
    if items.is_empty() && policy == EmptyListPolicy::Error {
        return Err(ServiceError::EmptyList(kind));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::{non_empty, ServiceError};
    use crate::config::EmptyListPolicy;
    use crate::model::EntityKind;
    use crate::repo::RepoError;

    #[test]
    fn repo_not_found_is_lifted_with_kind_and_id() {
        let err = ServiceError::from(RepoError::NotFound {
            kind: EntityKind::Address,
            id: 12,
        });
        assert!(matches!(
            err,
            ServiceError::NotFound {
                kind: EntityKind::Address,
                id: 12
            }
        ));
        assert_eq!(err.to_string(), "Address with ID: 12 could not be found");
    }

    #[test]
    fn empty_list_policy_controls_outcome() {
        let empty: Vec<u8> = Vec::new();
        assert!(matches!(
            non_empty(EmptyListPolicy::Error, EntityKind::Course, empty.clone()),
            Err(ServiceError::EmptyList(EntityKind::Course))
        ));
        assert!(non_empty(EmptyListPolicy::EmptySuccess, EntityKind::Course, empty)
            .unwrap()
            .is_empty());
        assert_eq!(
            non_empty(EmptyListPolicy::Error, EntityKind::Course, vec![1]).unwrap(),
            vec![1]
        );
    }
}
