//! Per-resource, per-operation permission policy.
//!
//! A [`ResourcePolicy`] assigns a [`Rule`] to each [`Operation`]. Checking a
//! request is a pure function of the rule, the [`Requester`] and the owner of
//! the target entity (if there is one).

use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
    Anonymous,
    User { id: DbId, role: String },
}

impl Requester {
    pub fn user_id(&self) -> Option<DbId> {
        match self {
            Requester::Anonymous => None,
            Requester::User { id, .. } => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Requester::User { .. })
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Requester::User { role, .. } if role == ROLE_ADMIN)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn verb(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Retrieve => "view",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Predicate applied to a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Anyone, including anonymous requesters.
    AllowAny,
    /// Any authenticated requester.
    Authenticated,
    /// The entity's creator or an admin. Ownerless entities are admin-only.
    OwnerOrAdmin,
    AdminOnly,
    /// Nobody; the operation is not offered for this resource.
    Deny,
}

impl Rule {
    pub fn allows(self, requester: &Requester, owner: Option<DbId>) -> bool {
        match self {
            Rule::AllowAny => true,
            Rule::Authenticated => requester.is_authenticated(),
            Rule::OwnerOrAdmin => {
                requester.is_admin()
                    || matches!((requester.user_id(), owner), (Some(me), Some(o)) if me == o)
            }
            Rule::AdminOnly => requester.is_admin(),
            Rule::Deny => false,
        }
    }
}

/// Rules for every operation on one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePolicy {
    pub list: Rule,
    pub retrieve: Rule,
    pub create: Rule,
    pub update: Rule,
    pub delete: Rule,
}

impl ResourcePolicy {
    /// Public reads, authenticated writes, deletes by owner or admin.
    ///
    /// Shared by genres, directors and movies.
    pub const CATALOG: ResourcePolicy = ResourcePolicy {
        list: Rule::AllowAny,
        retrieve: Rule::AllowAny,
        create: Rule::Authenticated,
        update: Rule::Authenticated,
        delete: Rule::OwnerOrAdmin,
    };

    /// Public listing only; user accounts are managed through `/auth`.
    pub const USER_DIRECTORY: ResourcePolicy = ResourcePolicy {
        list: Rule::AllowAny,
        retrieve: Rule::Deny,
        create: Rule::Deny,
        update: Rule::Deny,
        delete: Rule::Deny,
    };

    pub fn rule(&self, operation: Operation) -> Rule {
        match operation {
            Operation::List => self.list,
            Operation::Retrieve => self.retrieve,
            Operation::Create => self.create,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    /// Check `operation` for `requester` against an entity owned by `owner`.
    ///
    /// Collection-level operations (list, create) pass `None` as owner.
    pub fn authorize(
        &self,
        operation: Operation,
        requester: &Requester,
        owner: Option<DbId>,
    ) -> Result<(), CoreError> {
        let rule = self.rule(operation);
        if rule.allows(requester, owner) {
            return Ok(());
        }

        let reason = match (rule, requester) {
            (_, Requester::Anonymous) if rule != Rule::Deny => {
                format!("Authentication required to {} this resource", operation.verb())
            }
            (Rule::OwnerOrAdmin, _) => format!(
                "Only the owner or an admin may {} this resource",
                operation.verb()
            ),
            (Rule::AdminOnly, _) => {
                format!("Admin role required to {} this resource", operation.verb())
            }
            _ => format!("Not allowed to {} this resource", operation.verb()),
        };
        Err(CoreError::Forbidden(reason))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::ROLE_USER;

    fn user(id: DbId) -> Requester {
        Requester::User {
            id,
            role: ROLE_USER.to_string(),
        }
    }

    fn admin(id: DbId) -> Requester {
        Requester::User {
            id,
            role: ROLE_ADMIN.to_string(),
        }
    }

    #[test]
    fn catalog_reads_are_open_to_anonymous() {
        let policy = ResourcePolicy::CATALOG;
        assert!(policy.authorize(Operation::List, &Requester::Anonymous, None).is_ok());
        assert!(policy
            .authorize(Operation::Retrieve, &Requester::Anonymous, Some(7))
            .is_ok());
    }

    #[test]
    fn catalog_writes_require_authentication() {
        let policy = ResourcePolicy::CATALOG;
        for op in [Operation::Create, Operation::Update, Operation::Delete] {
            let err = policy.authorize(op, &Requester::Anonymous, Some(1)).unwrap_err();
            assert_matches!(err, CoreError::Forbidden(msg) => {
                assert!(msg.contains("Authentication required"));
            });
        }
        assert!(policy.authorize(Operation::Create, &user(1), None).is_ok());
        assert!(policy.authorize(Operation::Update, &user(2), Some(1)).is_ok());
    }

    #[test]
    fn delete_is_owner_or_admin() {
        let policy = ResourcePolicy::CATALOG;
        assert!(policy.authorize(Operation::Delete, &user(5), Some(5)).is_ok());
        assert!(policy.authorize(Operation::Delete, &admin(9), Some(5)).is_ok());

        let err = policy.authorize(Operation::Delete, &user(6), Some(5)).unwrap_err();
        assert_matches!(err, CoreError::Forbidden(msg) => {
            assert!(msg.contains("owner or an admin"));
        });
    }

    #[test]
    fn ownerless_entities_are_admin_only() {
        assert!(!Rule::OwnerOrAdmin.allows(&user(1), None));
        assert!(Rule::OwnerOrAdmin.allows(&admin(1), None));
    }

    #[test]
    fn user_directory_only_lists() {
        let policy = ResourcePolicy::USER_DIRECTORY;
        assert!(policy.authorize(Operation::List, &Requester::Anonymous, None).is_ok());
        assert_matches!(
            policy.authorize(Operation::Delete, &admin(1), Some(2)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn requester_helpers() {
        assert_eq!(Requester::Anonymous.user_id(), None);
        assert!(!Requester::Anonymous.is_authenticated());
        assert_eq!(user(3).user_id(), Some(3));
        assert!(!user(3).is_admin());
        assert!(admin(3).is_admin());
    }
}
