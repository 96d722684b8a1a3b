use proptest::prelude::*;

use opal_crypto::{derive_request_id, keypair_from_seed};
use opal_predicates::{decode_predicate, encode_predicate, Predicate};
use opal_types::StateHash;

proptest! {
    /// Request ids are a pure function of (owner, state hash).
    #[test]
    fn request_id_deterministic(seed in any::<[u8; 32]>(), state in any::<[u8; 32]>()) {
        let kp = keypair_from_seed(&seed);
        let state_hash = StateHash::new(state);
        let r1 = derive_request_id(&kp.public, &state_hash);
        let r2 = derive_request_id(&kp.public, &state_hash);
        prop_assert_eq!(r1, r2);
    }

    /// Distinct (owner, state) pairs produce distinct request ids.
    #[test]
    fn request_id_unique_across_states(
        seed in any::<[u8; 32]>(),
        state_a in any::<[u8; 32]>(),
        state_b in any::<[u8; 32]>(),
    ) {
        prop_assume!(state_a != state_b);
        let kp = keypair_from_seed(&seed);
        let r_a = derive_request_id(&kp.public, &StateHash::new(state_a));
        let r_b = derive_request_id(&kp.public, &StateHash::new(state_b));
        prop_assert_ne!(r_a, r_b);
    }

    /// Distinct owners produce distinct request ids for the same state.
    #[test]
    fn request_id_unique_across_owners(
        seed_a in any::<[u8; 32]>(),
        seed_b in any::<[u8; 32]>(),
        state in any::<[u8; 32]>(),
    ) {
        prop_assume!(seed_a != seed_b);
        let kp_a = keypair_from_seed(&seed_a);
        let kp_b = keypair_from_seed(&seed_b);
        let state_hash = StateHash::new(state);
        prop_assert_ne!(
            derive_request_id(&kp_a.public, &state_hash),
            derive_request_id(&kp_b.public, &state_hash)
        );
    }

    /// decode(encode(p)) == p for unmasked predicates.
    #[test]
    fn unmasked_codec_roundtrip(seed in any::<[u8; 32]>()) {
        let kp = keypair_from_seed(&seed);
        let p = Predicate::unmasked(&kp.private);
        prop_assert_eq!(decode_predicate(&encode_predicate(&p)).unwrap(), p);
    }

    /// decode(encode(p)) == p for masked predicates, any nonce.
    #[test]
    fn masked_codec_roundtrip(seed in any::<[u8; 32]>(), nonce in any::<[u8; 32]>()) {
        let kp = keypair_from_seed(&seed);
        let p = Predicate::masked(&kp.private, nonce);
        prop_assert_eq!(decode_predicate(&encode_predicate(&p)).unwrap(), p);
    }

    /// Address derivation never changes across repeated calls.
    #[test]
    fn address_stable(seed in any::<[u8; 32]>(), nonce in any::<[u8; 32]>()) {
        let kp = keypair_from_seed(&seed);
        let p = Predicate::masked(&kp.private, nonce);
        prop_assert_eq!(p.address(), p.address());
    }

    /// A truncated encoding never decodes successfully.
    #[test]
    fn truncated_encoding_rejected(seed in any::<[u8; 32]>(), cut in 1usize..34) {
        let kp = keypair_from_seed(&seed);
        let bytes = encode_predicate(&Predicate::unmasked(&kp.private));
        prop_assert!(decode_predicate(&bytes[..bytes.len() - cut]).is_err());
    }
}
