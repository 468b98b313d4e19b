use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keyshard::numtheory::mod_pow;
use keyshard::{combine_shares, generate_keypair, refresh_shares, split_secret};
use num_bigint::{BigInt, BigUint};
use num_traits::One;

fn bench_split_secret(c: &mut Criterion) {
    c.bench_function("split_secret", |b| {
        let secret = (BigInt::one() << 200) + BigInt::from(987_654_321i64);
        let threshold = 5;
        let shares = 10;
        let mut rng = rand::thread_rng();
        b.iter(|| {
            split_secret(
                black_box(&secret),
                black_box(threshold),
                black_box(shares),
                &mut rng,
            )
        })
    });
}

fn bench_combine_shares(c: &mut Criterion) {
    c.bench_function("combine_shares", |b| {
        let secret = (BigInt::one() << 200) + BigInt::from(987_654_321i64);
        let threshold = 5;
        let mut rng = rand::thread_rng();
        let shares = split_secret(&secret, threshold, 10, &mut rng).unwrap();
        b.iter(|| combine_shares(black_box(&shares), black_box(threshold)))
    });
}

fn bench_refresh_shares(c: &mut Criterion) {
    c.bench_function("refresh_shares", |b| {
        let secret = BigInt::from(0xDEAD_BEEFu32);
        let threshold = 5;
        let mut rng = rand::thread_rng();
        let mut shares = split_secret(&secret, threshold, 10, &mut rng).unwrap();

        b.iter(|| {
            let _ = refresh_shares(black_box(&mut shares), black_box(threshold), &mut rng);
        })
    });
}

fn bench_mod_pow(c: &mut Criterion) {
    c.bench_function("mod_pow", |b| {
        let base = BigInt::from(0x1234_5678u32);
        let exponent = BigUint::from(0xFEDC_BA98u32);
        let modulus = (BigUint::one() << 127) - BigUint::one();
        b.iter(|| mod_pow(black_box(&base), black_box(&exponent), black_box(&modulus)))
    });
}

fn bench_generate_keypair(c: &mut Criterion) {
    c.bench_function("generate_keypair", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| generate_keypair(black_box(10), black_box(11), 1000, 10, &mut rng))
    });
}

criterion_group!(
    benches,
    bench_split_secret,
    bench_combine_shares,
    bench_refresh_shares,
    bench_mod_pow,
    bench_generate_keypair
);
criterion_main!(benches);
