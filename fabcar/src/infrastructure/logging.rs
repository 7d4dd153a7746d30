//! Utilities for our logging (tracing) infrastructure.

use std::fmt::Debug;
use tracing::{warn, Span};

/// For the current active span, record `field_value` for the field
/// `field_name`. This field must already be declared on the current span.
///
/// All events that happen inside this span will have these fields attached as
/// additional data.
///
/// For example:
/// ```text
///   2024-03-05T19:47:03.090605Z  INFO fabcar_chaincode::operations::update_car_owner: Starting update car owner operation.
///     at fabcar-chaincode/src/operations/update_car_owner.rs:30
///     in fabcar_chaincode::operations::update_car_owner::operation with car_id: "CAR1"
///     in fabcar_chaincode::contract::invoke with chaincode: fabcar_cc, function: "UpdateCarOwner", tx_id: "5c1e..."
/// ```
/// We can see here the `invoke` span has fields "function" and "tx_id".
///
/// In debug builds, this function checks whether the field has NOT been
/// declared and logs a warning.
///
/// Note: We use dynamic dispatch for the `field_value` argument as we expect
/// lots of types to call this function.
pub fn record_field(field_name: &str, field_value: &dyn Debug) {
    if cfg!(debug_assertions) && !Span::current().has_field(field_name) {
        warn!("Field {} not defined in current span!", field_name);
    }

    // Ignore the resulting span.
    let _ = Span::current().record(field_name, &format!("{field_value:?}"));
}
