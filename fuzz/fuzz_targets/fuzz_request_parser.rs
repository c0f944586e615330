//! Fuzz target: `ActuatorCommand::from_request`
//!
//! Splits arbitrary UTF-8 into path and query and asserts the parser never
//! panics and that every numeric command it accepts came from a parameter
//! that is really present in the query.
//!
//! cargo fuzz run fuzz_request_parser

#![no_main]

use actuator_node::app::commands::{ActuatorCommand, query_param, split_uri};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(uri) = core::str::from_utf8(data) else {
        return;
    };
    let (path, query) = split_uri(uri);

    match ActuatorCommand::from_request(path, query) {
        Ok(ActuatorCommand::SetAngle(_)) => {
            assert!(query_param(query, "angle").is_some(), "angle without parameter");
        }
        Ok(ActuatorCommand::SetSpeed(_)) => {
            assert!(query_param(query, "speed").is_some(), "speed without parameter");
        }
        Ok(_) | Err(_) => {}
    }
});
