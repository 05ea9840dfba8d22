use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use chrono::TimeDelta;
use souq_auth::{
    AdminAccess, GuardChain, KeyMaterial, Permission, TokenCodec, TokenIssuer, TokenVerifier,
};
use souq_core::{CityId, Role, User, UserId, UserState};

fn setup() -> (TokenIssuer, TokenVerifier) {
    let codec = TokenCodec::new(Arc::new(KeyMaterial::from_bytes([3u8; 32])));
    let issuer = TokenIssuer::new(codec.clone(), TimeDelta::minutes(15), TimeDelta::hours(720));
    (issuer, TokenVerifier::new(codec))
}

fn user(role: Role) -> User {
    User::new(UserId::new(1), role, UserState::Approved, CityId::new(1))
}

fn admin_access(permissions: usize) -> AdminAccess {
    AdminAccess::new((0..permissions).map(|i| Permission::new(format!("module{i}.manage"))))
}

fn bench_issue(c: &mut Criterion) {
    let mut group = c.benchmark_group("issue");
    let (issuer, _) = setup();

    group.bench_function("access_token", |b| {
        let subject = user(Role::Retailer);
        b.iter(|| issuer.issue_access_token(black_box(&subject), None).unwrap());
    });

    group.bench_function("refresh_token", |b| {
        let subject = user(Role::Retailer);
        b.iter(|| issuer.issue_refresh_token(black_box(&subject)).unwrap());
    });

    // Admin tokens grow with the permission snapshot.
    for permissions in [1usize, 16, 128] {
        group.bench_with_input(
            BenchmarkId::new("admin_access_token", permissions),
            &permissions,
            |b, &n| {
                let subject = user(Role::Admin);
                let access = admin_access(n);
                b.iter(|| {
                    issuer
                        .issue_access_token(black_box(&subject), Some(access.clone()))
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    let (issuer, verifier) = setup();

    let token = issuer
        .issue_access_token(&user(Role::Retailer), None)
        .unwrap()
        .token;
    group.bench_function("valid_access_token", |b| {
        b.iter(|| verifier.verify_access_token(black_box(&token)).unwrap());
    });

    let mut forged = token.clone();
    forged.pop();
    forged.push(if token.ends_with('A') { 'B' } else { 'A' });
    group.bench_function("tampered_access_token", |b| {
        b.iter(|| verifier.verify_access_token(black_box(&forged)).is_err());
    });

    group.finish();
}

fn bench_guard_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("guard_chain");
    let (issuer, verifier) = setup();

    let header = format!(
        "Bearer {}",
        issuer
            .issue_access_token(&user(Role::Admin), Some(admin_access(8)))
            .unwrap()
            .token
    );
    let chain = GuardChain::admin();

    group.bench_function("admin_chain_accepts", |b| {
        b.iter(|| chain.evaluate(&verifier, black_box(Some(header.as_str()))).unwrap());
    });

    group.bench_function("missing_header_rejected", |b| {
        b.iter(|| chain.evaluate(&verifier, black_box(None)).is_err());
    });

    group.finish();
}

criterion_group!(benches, bench_issue, bench_verify, bench_guard_chain);
criterion_main!(benches);
