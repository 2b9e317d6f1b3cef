//! Signing walk with a stand-in signer.
//!
//! The signer below produces structurally valid RRSIG and NSEC records with
//! placeholder signature bytes, which is all the zone store looks at.

use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use parking_lot::Mutex;
use zonehold_proto::rdata::{DNSKEY, NSEC, RRSIG, SOA};
use zonehold_proto::{Name, RecordType, ResourceRecord, Type};
use zonehold_zone::{
    NodeContext, NodeSignatures, SignatureConfig, Zone, ZoneError, ZoneSigner,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn ksk() -> ResourceRecord {
    ResourceRecord::dnskey(
        name("example.com."),
        3600,
        DNSKEY::new(DNSKEY::FLAG_ZONE_KEY | DNSKEY::FLAG_SEP, 3, 13, vec![1; 64]),
    )
}

fn zsk() -> ResourceRecord {
    ResourceRecord::dnskey(
        name("example.com."),
        3600,
        DNSKEY::new(DNSKEY::FLAG_ZONE_KEY, 3, 13, vec![2; 64]),
    )
}

fn fixed_policy() -> SignatureConfig {
    SignatureConfig {
        jitter: Duration::ZERO,
        ..SignatureConfig::default()
    }
}

fn sample_zone() -> Zone {
    let zone = Zone::new("example.com.").unwrap();
    let soa = SOA::new(
        name("ns1.example.com."),
        name("hostmaster.example.com."),
        1,
        7200,
        3600,
        1_209_600,
        900,
    );
    zone.insert(ResourceRecord::soa(name("example.com."), 3600, soa)).unwrap();
    zone.insert(ResourceRecord::ns(name("example.com."), 3600, name("ns1.example.com.")))
        .unwrap();
    zone.insert(ResourceRecord::a(name("ns1.example.com."), 3600, Ipv4Addr::new(192, 0, 2, 53)))
        .unwrap();
    zone.insert(ResourceRecord::a(name("www.example.com."), 300, Ipv4Addr::new(192, 0, 2, 80)))
        .unwrap();
    zone.insert(ResourceRecord::ns(name("sub.example.com."), 3600, name("ns.sub.example.com.")))
        .unwrap();
    zone.insert(ResourceRecord::a(
        name("ns.sub.example.com."),
        3600,
        Ipv4Addr::new(192, 0, 2, 99),
    ))
    .unwrap();
    zone
}

/// Signs every signable RRset with the first suitable key.
#[derive(Default)]
struct StubSigner {
    visited: Mutex<Vec<(Name, Name)>>,
}

impl ZoneSigner for StubSigner {
    fn sign_node(&self, ctx: &NodeContext<'_>) -> zonehold_zone::Result<NodeSignatures> {
        self.visited.lock().push((ctx.name.clone(), ctx.next.clone()));

        let mut signatures = Vec::new();
        for rtype in ctx.signable_types().into_iter().chain([Type::Known(RecordType::NSEC)]) {
            let Some(key) = ctx.keys.for_type(rtype).first() else {
                return Err(ZoneError::signing("no key"));
            };
            let dnskey = key.rdata().as_dnskey().unwrap();
            let sig = RRSIG::new(
                rtype,
                dnskey.algorithm(),
                ctx.name.rrsig_label_count(),
                300,
                ctx.window.expiration_serial(),
                ctx.window.inception_serial(),
                dnskey.key_tag(),
                ctx.origin.clone(),
                vec![0; 64],
            );
            signatures.push(ResourceRecord::rrsig(ctx.name.clone(), 300, sig));
        }

        let nsec = NSEC::from_types(ctx.next.clone(), ctx.nsec_types());
        Ok(NodeSignatures {
            signatures,
            nsec: Some(ResourceRecord::nsec(ctx.name.clone(), ctx.nsec_ttl, nsec)),
        })
    }
}

/// Returns records that belong somewhere else.
struct RogueSigner;

impl ZoneSigner for RogueSigner {
    fn sign_node(&self, _ctx: &NodeContext<'_>) -> zonehold_zone::Result<NodeSignatures> {
        let stray = ResourceRecord::txt(name("elsewhere.example.com."), 60, "x");
        Ok(NodeSignatures {
            signatures: vec![stray],
            nsec: None,
        })
    }
}

/// Signs like [`StubSigner`] but fails on its second name.
#[derive(Default)]
struct FailsOnSecond {
    inner: StubSigner,
}

impl ZoneSigner for FailsOnSecond {
    fn sign_node(&self, ctx: &NodeContext<'_>) -> zonehold_zone::Result<NodeSignatures> {
        if self.inner.visited.lock().len() == 1 {
            return Err(ZoneError::signing("hardware token unplugged"));
        }
        self.inner.sign_node(ctx)
    }
}

/// Asserts that no signing pass has touched `zone`.
fn assert_unsigned(zone: &Zone) {
    for node in zone.nodes() {
        assert!(node.records(RecordType::NSEC).is_empty(), "{} has an NSEC", node.name());
        assert!(node.read().signed_types().is_empty(), "{} is signed", node.name());
    }
    let apex = zone.find_str("example.com.").unwrap().unwrap();
    assert!(apex.records(RecordType::DNSKEY).is_empty());
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_sign_builds_nsec_chain() {
    let zone = sample_zone();
    let signer = StubSigner::default();
    let report = zone
        .sign_at(&[ksk(), zsk()], Some(&fixed_policy()), &signer, now())
        .unwrap();

    // ns.sub.example.com. is glue below the cut.
    assert_eq!(report.names_occluded, 1);
    assert_eq!(report.names_signed, 4);
    assert_eq!(report.nsec_records, 4);
    assert_eq!(report.keys_added, 2);

    let visited = signer.visited.lock().clone();
    let expected = [
        ("example.com.", "ns1.example.com."),
        ("ns1.example.com.", "sub.example.com."),
        ("sub.example.com.", "www.example.com."),
        ("www.example.com.", "example.com."),
    ];
    assert_eq!(visited.len(), expected.len());
    for ((owner, next), (want_owner, want_next)) in visited.iter().zip(expected) {
        assert_eq!(owner, &name(want_owner));
        assert_eq!(next, &name(want_next));
    }

    let www = zone.find_str("www.example.com.").unwrap().unwrap();
    let nsec = www.records(RecordType::NSEC);
    assert_eq!(nsec.len(), 1);
    assert_eq!(nsec[0].ttl(), 900);
    match nsec[0].rdata() {
        zonehold_proto::RData::NSEC(data) => {
            assert_eq!(data.next_name(), &name("example.com."));
            assert!(data.covers(RecordType::A));
            assert!(data.covers(RecordType::RRSIG));
        }
        other => panic!("unexpected rdata {other}"),
    }
    assert_eq!(www.signatures(RecordType::A).len(), 1);
    assert_eq!(www.signatures(RecordType::NSEC).len(), 1);
}

#[test]
fn test_sign_publishes_keys_and_uses_ksk_for_dnskey() {
    let zone = sample_zone();
    zone.sign_at(&[ksk(), zsk()], None, &StubSigner::default(), now())
        .unwrap();

    let apex = zone.find_str("example.com.").unwrap().unwrap();
    assert_eq!(apex.records(RecordType::DNSKEY).len(), 2);

    let ksk_tag = ksk().rdata().as_dnskey().unwrap().key_tag();
    let zsk_tag = zsk().rdata().as_dnskey().unwrap().key_tag();
    let tag_of = |rr: &ResourceRecord| rr.rdata().as_rrsig().unwrap().key_tag();
    assert_eq!(tag_of(&apex.signatures(RecordType::DNSKEY)[0]), ksk_tag);
    assert_eq!(tag_of(&apex.signatures(RecordType::SOA)[0]), zsk_tag);

    // Signing again does not publish the keys twice.
    let report = zone
        .sign_at(&[ksk(), zsk()], None, &StubSigner::default(), now())
        .unwrap();
    assert_eq!(report.keys_added, 0);
    assert_eq!(apex.records(RecordType::DNSKEY).len(), 2);
    assert_eq!(apex.signatures(RecordType::SOA).len(), 1);
}

#[test]
fn test_delegation_signs_only_ds_and_nsec() {
    let zone = sample_zone();
    zone.sign_at(&[zsk()], None, &StubSigner::default(), now())
        .unwrap();

    let cut = zone.find_str("sub.example.com.").unwrap().unwrap();
    assert!(cut.signatures(RecordType::NS).is_empty());
    assert_eq!(cut.signatures(RecordType::NSEC).len(), 1);

    let glue = zone.find_str("ns.sub.example.com.").unwrap().unwrap();
    assert!(glue.signatures(RecordType::A).is_empty());
    assert!(glue.records(RecordType::NSEC).is_empty());
}

#[test]
fn test_signing_window() {
    let zone = sample_zone();
    let report = zone
        .sign_at(&[zsk()], Some(&fixed_policy()), &StubSigner::default(), now())
        .unwrap();

    assert_eq!(report.window.inception, now() - TimeDelta::seconds(300));
    assert_eq!(report.window.expiration, now() + TimeDelta::days(28));

    let www = zone.find_str("www.example.com.").unwrap().unwrap();
    let sig = www.signatures(RecordType::A)[0].clone();
    let rrsig = sig.rdata().as_rrsig().unwrap();
    assert_eq!(rrsig.inception(), report.window.inception_serial());
    assert_eq!(rrsig.expiration(), report.window.expiration_serial());
}

#[test]
fn test_needs_refresh() {
    let zone = sample_zone();
    let policy = fixed_policy();
    assert!(!zone.needs_refresh(&policy, now()));

    zone.sign_at(&[zsk()], Some(&policy), &StubSigner::default(), now())
        .unwrap();
    assert!(!zone.needs_refresh(&policy, now()));
    assert!(!zone.needs_refresh(&policy, now() + TimeDelta::days(24)));
    assert!(zone.needs_refresh(&policy, now() + TimeDelta::days(25)));
}

#[test]
fn test_rejects_bad_keys() {
    let zone = sample_zone();
    let signer = StubSigner::default();

    let err = zone.sign_at(&[], None, &signer, now()).unwrap_err();
    assert!(matches!(err, ZoneError::Signing { .. }));

    let foreign = ResourceRecord::dnskey(
        name("example.org."),
        3600,
        DNSKEY::new(DNSKEY::FLAG_ZONE_KEY, 3, 13, vec![3; 64]),
    );
    assert!(zone.sign_at(&[foreign], None, &signer, now()).is_err());

    let bad_protocol = ResourceRecord::dnskey(
        name("example.com."),
        3600,
        DNSKEY::new(DNSKEY::FLAG_ZONE_KEY, 2, 13, vec![3; 64]),
    );
    assert!(zone.sign_at(&[bad_protocol], None, &signer, now()).is_err());

    // Nothing was signed or published.
    assert!(signer.visited.lock().is_empty());
    let apex = zone.find_str("example.com.").unwrap().unwrap();
    assert!(apex.records(RecordType::DNSKEY).is_empty());
}

#[test]
fn test_rejects_bad_policy() {
    let zone = sample_zone();
    let policy = SignatureConfig {
        refresh: Duration::from_secs(60 * 60 * 24 * 60),
        ..SignatureConfig::default()
    };
    let err = zone
        .sign_at(&[zsk()], Some(&policy), &StubSigner::default(), now())
        .unwrap_err();
    assert!(matches!(err, ZoneError::InvalidPolicy { .. }));
}

#[test]
fn test_rejects_unrepresentable_validity() {
    let zone = sample_zone();
    let policy = SignatureConfig {
        validity: Duration::from_secs(10_000_000_000_000),
        ..SignatureConfig::default()
    };
    let err = zone
        .sign_at(&[ksk()], Some(&policy), &StubSigner::default(), now())
        .unwrap_err();
    assert!(matches!(err, ZoneError::InvalidPolicy { .. }));

    let err = zone
        .sign_at(&[ksk()], None, &StubSigner::default(), DateTime::<Utc>::MAX_UTC)
        .unwrap_err();
    assert!(matches!(err, ZoneError::InvalidPolicy { .. }));
    assert_unsigned(&zone);
}

#[test]
fn test_signer_failure_leaves_zone_unchanged() {
    let zone = sample_zone();
    let signer = FailsOnSecond::default();
    let err = zone
        .sign_at(&[ksk(), zsk()], None, &signer, now())
        .unwrap_err();
    assert!(matches!(err, ZoneError::Signing { .. }));
    assert_eq!(signer.inner.visited.lock().len(), 1);
    assert_unsigned(&zone);

    // A later pass with a working signer covers every name.
    let report = zone
        .sign_at(&[ksk(), zsk()], None, &StubSigner::default(), now())
        .unwrap();
    assert_eq!(report.names_signed, 4);
    assert_eq!(report.keys_added, 2);
}

#[test]
fn test_requires_soa() {
    let zone = Zone::new("example.com.").unwrap();
    let err = zone
        .sign_at(&[zsk()], None, &StubSigner::default(), now())
        .unwrap_err();
    assert!(matches!(err, ZoneError::Signing { .. }));
}

#[test]
fn test_rejects_foreign_signer_output() {
    let zone = sample_zone();
    let err = zone.sign_at(&[zsk()], None, &RogueSigner, now()).unwrap_err();
    assert!(matches!(err, ZoneError::Signing { .. }));
    assert_unsigned(&zone);
}
