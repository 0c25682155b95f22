//! JSON boundary codecs: the raw gateway callback shape and the
//! line-delimited event reader that normalizes inbound events into
//! [`crate::domain::payment::PaymentRequest`]s.

pub mod callback_reader;
