//! TLS material for the listener (native-tls).
//!
//! - cert.pem: одна или несколько CERTIFICATE секций (leaf первым).
//! - key.rsa:  PKCS#8 ("PRIVATE KEY") или PKCS#1 ("RSA PRIVATE KEY").
//!   PKCS#1 оборачивается в PKCS#8 (native-tls принимает только PKCS#8).

use anyhow::{anyhow, Context, Result};
use native_tls::{Identity, TlsAcceptor};
use std::path::Path;

/// AlgorithmIdentifier { rsaEncryption (1.2.840.113549.1.1.1), NULL }.
const RSA_ALGORITHM_ID: &[u8] = &[
    0x30, 0x0D, 0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01, 0x05, 0x00,
];

pub fn load_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor> {
    let cert = std::fs::read(cert_path)
        .with_context(|| format!("read certificate {}", cert_path.display()))?;
    let key =
        std::fs::read(key_path).with_context(|| format!("read key {}", key_path.display()))?;
    let identity = load_identity(&cert, &key)?;
    TlsAcceptor::new(identity).map_err(|e| anyhow!("tls acceptor: {}", e))
}

pub fn load_identity(cert_pem: &[u8], key_pem: &[u8]) -> Result<Identity> {
    let certs = pem::parse_many(cert_pem).map_err(|e| anyhow!("parse certificate PEM: {}", e))?;
    if !certs.iter().any(|p| p.tag() == "CERTIFICATE") {
        return Err(anyhow!("no CERTIFICATE block in certificate file"));
    }
    let key = pkcs8_key_pem(key_pem)?;
    Identity::from_pkcs8(cert_pem, key.as_bytes()).map_err(|e| anyhow!("load identity: {}", e))
}

/// Private key as PKCS#8 PEM.
pub fn pkcs8_key_pem(key_pem: &[u8]) -> Result<String> {
    let key = pem::parse(key_pem).map_err(|e| anyhow!("parse key PEM: {}", e))?;
    match key.tag() {
        "PRIVATE KEY" => Ok(pem::encode(&key)),
        "RSA PRIVATE KEY" => {
            let wrapped = wrap_pkcs1(key.contents());
            Ok(pem::encode(&pem::Pem::new("PRIVATE KEY", wrapped)))
        }
        other => Err(anyhow!("unsupported key type '{}' (expect PKCS#8 or RSA PKCS#1)", other)),
    }
}

/// PrivateKeyInfo ::= SEQUENCE { INTEGER 0, AlgorithmIdentifier, OCTET STRING pkcs1 }
pub fn wrap_pkcs1(pkcs1_der: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(pkcs1_der.len() + 32);
    body.extend_from_slice(&[0x02, 0x01, 0x00]);
    body.extend_from_slice(RSA_ALGORITHM_ID);
    body.push(0x04);
    der_len(&mut body, pkcs1_der.len());
    body.extend_from_slice(pkcs1_der);

    let mut out = Vec::with_capacity(body.len() + 6);
    out.push(0x30);
    der_len(&mut out, body.len());
    out.extend_from_slice(&body);
    out
}

fn der_len(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}
