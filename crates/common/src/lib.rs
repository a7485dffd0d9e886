pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn upvote_ack_serializes_entry_and_count() {
        let ack = types::UpvoteAck { entry_id: 7, upvotes: 3 };
        let s = serde_json::to_string(&ack).expect("serialize");
        assert!(s.contains("\"entry_id\":7"));
        assert!(s.contains("\"upvotes\":3"));
    }
}
