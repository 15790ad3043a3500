//! User and session identifiers, shared with the rest of the workspace.

pub use kernel::id::{SessionId, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_v4() {
        assert_eq!(UserId::new().as_uuid().get_version_num(), 4);
        assert_eq!(SessionId::new().as_uuid().get_version_num(), 4);
    }
}
