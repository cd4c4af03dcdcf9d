/*++

Licensed under the Apache-2.0 license.

File Name:

    verify.rs

Abstract:

    File contains the signature-verification capability boundary used by the
    carrier lock.

--*/

/// The opaque verification primitive supplied by the hosting environment.
/// The engine never interprets key material; it forwards the stored key
/// bytes, the assembled message and the presented signature.
pub trait SignatureVerifier {
    fn verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> bool;
}
