//! Tests for strongly-typed identifiers

use core_kernel::{ClientId, LoanId, PaymentId};
use std::collections::HashSet;
use uuid::Uuid;

mod display {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert!(LoanId::new().to_string().starts_with("LN-"));
        assert!(ClientId::new().to_string().starts_with("CLI-"));
        assert!(PaymentId::new().to_string().starts_with("PAY-"));
    }

    #[test]
    fn test_prefix_accessor() {
        assert_eq!(LoanId::prefix(), "LN");
        assert_eq!(PaymentId::prefix(), "PAY");
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_parse_prefixed_form() {
        let id = LoanId::new();
        let parsed: LoanId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_bare_uuid() {
        let uuid = Uuid::new_v4();
        let parsed: LoanId = uuid.to_string().parse().unwrap();
        assert_eq!(parsed.as_uuid(), &uuid);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("LN-not-a-uuid".parse::<LoanId>().is_err());
    }
}

mod ordering {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| PaymentId::new_v7()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_serde_is_transparent() {
        let uuid = Uuid::new_v4();
        let id = LoanId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}
