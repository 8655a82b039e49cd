use serde::Serialize;

/// Serializes a business payload to the canonical JSON string that is both
/// signed and encrypted.
///
/// The payload is first converted to a [`serde_json::Value`], whose object
/// representation keeps keys in sorted order, so two payloads that differ
/// only in field insertion order produce byte-identical output. The server
/// verifies the signature over the decrypted body, which makes the client's
/// own serialization the contract: canonical form only has to be stable, not
/// shared with other implementations.
pub fn canonical_json<T: Serialize>(payload: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(payload)?;
    serde_json::to_string(&value)
}
