use base64::Engine;
use rand::RngCore;

/// Number of random bytes in a generated id.
pub const ID_BYTES: usize = 12;

/// Generates an opaque post id: [`ID_BYTES`] random bytes encoded
/// with the URL-safe base64 alphabet and no padding.
pub fn generate() -> String {
	let mut bytes = [0u8; ID_BYTES];
	rand::thread_rng().fill_bytes(&mut bytes);

	base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
