use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Generate an unpredictable state nonce for CSRF protection. URL-safe so
/// it passes through the authorization redirect unescaped.
pub fn generate_state() -> String {
    let mut buf = [0u8; 32];
    rand::Rng::fill_bytes(&mut rand::rng(), &mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}
