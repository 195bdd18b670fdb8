pub const PROCESSED_PAYMENTS_SET_KEY: &str = "processed_payments";
