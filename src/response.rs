//! Response mapping: the last step of every dispatch.
//!
//! The router passes each handler's raw result through a [`ResponseMapper`]
//! before returning it, so a transport layer can inject its own response
//! construction. The default, [`PassResponseMapper`], returns the value as is.

use serde_json::{json, Value};

/// Transforms a handler's raw result into the outgoing response value.
pub trait ResponseMapper {
    fn map_response(&self, raw: Value) -> Value;
}

/// Identity mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassResponseMapper;

impl ResponseMapper for PassResponseMapper {
    fn map_response(&self, raw: Value) -> Value {
        raw
    }
}

/// Wraps raw results in a `{ "status": .., "body": .. }` envelope.
///
/// Handlers that already return an object with a numeric `status` field are
/// passed through untouched.
#[derive(Debug, Clone, Copy)]
pub struct EnvelopeResponseMapper {
    pub status: u16,
}

impl Default for EnvelopeResponseMapper {
    fn default() -> Self {
        Self { status: 200 }
    }
}

impl ResponseMapper for EnvelopeResponseMapper {
    fn map_response(&self, raw: Value) -> Value {
        if raw.get("status").is_some_and(Value::is_u64) && raw.get("body").is_some() {
            return raw;
        }
        json!({ "status": self.status, "body": raw })
    }
}

impl<F> ResponseMapper for F
where
    F: Fn(Value) -> Value,
{
    fn map_response(&self, raw: Value) -> Value {
        self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_mapper_is_identity() {
        assert_eq!(PassResponseMapper.map_response(json!("ok")), json!("ok"));
    }

    #[test]
    fn envelope_wraps_once() {
        let mapper = EnvelopeResponseMapper::default();
        let wrapped = mapper.map_response(json!([1, 2]));
        assert_eq!(wrapped, json!({ "status": 200, "body": [1, 2] }));
        assert_eq!(mapper.map_response(wrapped.clone()), wrapped);
    }

    #[test]
    fn closures_are_mappers() {
        let upper = |v: Value| json!(v.as_str().unwrap_or_default().to_uppercase());
        assert_eq!(upper.map_response(json!("ok")), json!("OK"));
    }
}
