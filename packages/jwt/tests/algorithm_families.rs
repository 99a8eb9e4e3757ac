//! Round trips, tampering and algorithm confusion across every family

use jwt_codec::{
    decode, parse, sign, Algorithm, Audience, Claims, Header, JwtError, KeyKind, SigningAlgorithm,
    StandardClaims,
};
use once_cell::sync::Lazy;
use rand_core::OsRng;
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};

static RSA_KEY: Lazy<RsaPrivateKey> =
    Lazy::new(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("RSA key generation"));

static OTHER_RSA_KEY: Lazy<RsaPrivateKey> =
    Lazy::new(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("RSA key generation"));

fn rsa_key() -> Option<RsaPrivateKey> {
    Some(RSA_KEY.clone())
}

fn all_algorithms() -> Vec<Algorithm> {
    vec![
        Algorithm::hs256("a fairly long shared secret, 32+").unwrap(),
        Algorithm::hs384("a fairly long shared secret for HS384 use, 48+ bytes").unwrap(),
        Algorithm::hs512("s").unwrap(),
        Algorithm::rs256(rsa_key(), None),
        Algorithm::rs384(rsa_key(), None),
        Algorithm::rs512(rsa_key(), None),
        Algorithm::ps256(rsa_key(), None),
        Algorithm::ps384(rsa_key(), None),
        Algorithm::ps512(rsa_key(), None),
        Algorithm::es256(Some(p256::ecdsa::SigningKey::random(&mut OsRng)), None),
        Algorithm::es384(Some(p384::ecdsa::SigningKey::random(&mut OsRng)), None),
        Algorithm::es512(Some(p521::ecdsa::SigningKey::random(&mut OsRng)), None),
        Algorithm::ed25519(Some(ed25519_dalek::SigningKey::generate(&mut OsRng)), None),
        Algorithm::none(),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    roles: Vec<String>,
    quota: u64,
}

fn claims(aud: Audience) -> Claims<Profile> {
    Claims::new(
        StandardClaims {
            iss: Some("issuer".into()),
            sub: Some("user-42".into()),
            aud,
            exp: Some(4_102_444_800),
            nbf: Some(1_600_000_000),
            iat: Some(1_600_000_000),
            jti: Some("id-1".into()),
        },
        Profile {
            name: "Ada".into(),
            roles: vec!["admin".into(), "ops".into()],
            quota: 7,
        },
    )
}

#[test]
fn test_round_trip_every_algorithm() {
    let names: Vec<_> = all_algorithms().iter().map(|a| a.name()).collect();
    assert_eq!(
        names,
        [
            "HS256", "HS384", "HS512", "RS256", "RS384", "RS512", "PS256", "PS384", "PS512",
            "ES256", "ES384", "ES512", "Ed25519", "none"
        ]
    );

    for alg in all_algorithms() {
        for aud in [
            Audience::default(),
            Audience::from("one"),
            Audience::from(["one", "two"]),
        ] {
            let original = claims(aud);
            let token = sign(&alg, Header::with_kid("k"), &original).unwrap();
            let decoded: Claims<Profile> = decode(&token, &alg, &[])
                .unwrap_or_else(|e| panic!("{}: {e}", alg.name()));
            assert_eq!(decoded.standard, original.standard, "{}", alg.name());
            assert_eq!(decoded.custom, original.custom, "{}", alg.name());
        }
    }
}

#[test]
fn test_signature_length_matches_declared_size() {
    for alg in all_algorithms() {
        let token = sign(&alg, Header::default(), &claims(Audience::default())).unwrap();
        let raw = parse(token.as_bytes()).unwrap();
        let expected = base64_len(alg.signature_size());
        assert_eq!(raw.signature_segment().len(), expected, "{}", alg.name());
    }
}

fn base64_len(bytes: usize) -> usize {
    (bytes * 4).div_ceil(3)
}

#[test]
fn test_single_byte_tamper_is_detected() {
    for alg in all_algorithms() {
        if alg.name() == "none" {
            continue;
        }
        let token = sign(&alg, Header::default(), &claims(Audience::from("a"))).unwrap();
        let signed_len = token.rfind('.').unwrap();
        for i in (0..signed_len).step_by(7) {
            let mut bytes = token.clone().into_bytes();
            if bytes[i] == b'.' {
                continue;
            }
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let result = decode::<serde_json::Value>(&bytes, &alg, &[]);
            assert!(result.is_err(), "{} accepted tamper at {i}", alg.name());
        }
    }
}

#[test]
fn test_algorithm_confusion_is_rejected() {
    let algorithms = all_algorithms();
    for signer in &algorithms {
        let token = sign(signer, Header::default(), &claims(Audience::default())).unwrap();
        for verifier in &algorithms {
            if verifier.name() == signer.name() {
                continue;
            }
            let err = decode::<serde_json::Value>(&token, verifier, &[]).unwrap_err();
            assert!(
                matches!(err, JwtError::AlgorithmMismatch { .. }),
                "{} token vs {} verifier: {err}",
                signer.name(),
                verifier.name()
            );
        }
    }
}

#[test]
fn test_header_alg_swap_with_same_key_fails() {
    // Same RSA key, header rewritten from PS256 to RS256.
    let ps256 = Algorithm::ps256(rsa_key(), None);
    let rs256 = Algorithm::rs256(rsa_key(), None);
    let token = sign(&ps256, Header::default(), &claims(Audience::default())).unwrap();
    let (_, rest) = token.split_once('.').unwrap();
    // {"alg":"RS256","typ":"JWT"}
    let forged = format!("eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.{rest}");
    let err = decode::<serde_json::Value>(&forged, &rs256, &[]).unwrap_err();
    assert!(matches!(err, JwtError::VerificationFailed { algorithm: "RS256" }));
}

#[test]
fn test_ecdsa_cross_key_rejection() {
    let k1 = p256::ecdsa::SigningKey::random(&mut OsRng);
    let k2 = p256::ecdsa::SigningKey::random(&mut OsRng);
    let signer = Algorithm::es256(Some(k1), None);
    let verifier = Algorithm::es256(None, Some(p256::ecdsa::VerifyingKey::from(&k2)));

    let token = sign(&signer, Header::default(), &claims(Audience::default())).unwrap();
    let err = decode::<serde_json::Value>(&token, &verifier, &[]).unwrap_err();
    assert!(matches!(err, JwtError::VerificationFailed { algorithm: "ES256" }));
}

#[test]
fn test_ecdsa_rejects_der_length_signatures() {
    let alg = Algorithm::es384(Some(p384::ecdsa::SigningKey::random(&mut OsRng)), None);
    let token = sign(&alg, Header::default(), &serde_json::json!({})).unwrap();
    let truncated = &token[..token.len() - 4];
    let err = decode::<serde_json::Value>(truncated, &alg, &[]).unwrap_err();
    assert!(matches!(err, JwtError::VerificationFailed { algorithm: "ES384" }));
}

#[test]
fn test_none_downgrade_is_rejected_both_ways() {
    let hs256 = Algorithm::hs256("secret").unwrap();
    let none = Algorithm::none();

    let unsigned = sign(&none, Header::default(), &claims(Audience::default())).unwrap();
    assert!(matches!(
        decode::<serde_json::Value>(&unsigned, &hs256, &[]),
        Err(JwtError::AlgorithmMismatch {
            expected: "HS256",
            ..
        })
    ));

    let signed = sign(&hs256, Header::default(), &claims(Audience::default())).unwrap();
    assert!(matches!(
        decode::<serde_json::Value>(&signed, &none, &[]),
        Err(JwtError::AlgorithmMismatch {
            expected: "none",
            ..
        })
    ));

    // A `none` token carrying a signature is not accepted either.
    let padded = format!("{unsigned}AAAA");
    assert!(matches!(
        decode::<serde_json::Value>(&padded, &none, &[]),
        Err(JwtError::VerificationFailed { algorithm: "none" })
    ));
}

#[test]
fn test_public_only_instances_verify_but_cannot_sign() {
    let signer = Algorithm::rs256(rsa_key(), None);
    let verifier = Algorithm::rs256(None, Some(RSA_KEY.to_public_key()));
    let token = sign(&signer, Header::default(), &claims(Audience::default())).unwrap();
    assert!(decode::<serde_json::Value>(&token, &verifier, &[]).is_ok());
    assert!(matches!(
        sign(&verifier, Header::default(), &()),
        Err(JwtError::MissingKey {
            algorithm: "RS256",
            key: KeyKind::Private
        })
    ));

    let stranger = Algorithm::rs256(None, Some(OTHER_RSA_KEY.to_public_key()));
    assert!(matches!(
        decode::<serde_json::Value>(&token, &stranger, &[]),
        Err(JwtError::VerificationFailed { .. })
    ));

    let empty = Algorithm::rs256(None, None);
    assert!(matches!(
        decode::<serde_json::Value>(&token, &empty, &[]),
        Err(JwtError::MissingKey {
            key: KeyKind::Public,
            ..
        })
    ));
}

#[test]
fn test_malformed_segments() {
    let alg = Algorithm::none();
    for input in ["", "a", "a.b"] {
        let err = parse(input.as_bytes()).unwrap_err();
        assert!(matches!(err, JwtError::Malformed(_)), "{input:?}: {err}");
    }
    let raw = parse(b"a.b.c.d").unwrap();
    assert_eq!(raw.signature_segment(), b"c.d");
    // Parsed, but the header is not valid base64url JSON.
    assert!(raw.verify(&alg).is_err());
}

#[test]
fn test_algorithms_are_shareable_across_threads() {
    let alg = std::sync::Arc::new(Algorithm::es256(
        Some(p256::ecdsa::SigningKey::random(&mut OsRng)),
        None,
    ));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let alg = alg.clone();
            std::thread::spawn(move || {
                for n in 0..25 {
                    let payload = serde_json::json!({ "thread": i, "n": n });
                    let token = sign(&alg, Header::default(), &payload).unwrap();
                    let back: serde_json::Value = decode(&token, &alg, &[]).unwrap();
                    assert_eq!(back, payload);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
