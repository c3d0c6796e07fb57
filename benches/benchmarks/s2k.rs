use criterion::{black_box, criterion_group, BenchmarkId, Criterion};
use pgp_keycodec::crypto::{hash::HashAlgorithm, sym::SymmetricKeyAlgorithm};
use pgp_keycodec::types::StringToKey;
use rand::distributions::{Alphanumeric, DistString};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn bench_s2k(c: &mut Criterion) {
    let sizes = [10, 100, 1000];
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let mut group = c.benchmark_group("s2k");
    let algs = [
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
    ];
    let counts = [
        1u8,
        0x60,    // gpg 1.x default
        u8::MAX, // maximum possible
    ];
    let sym_algs = [SymmetricKeyAlgorithm::CAST5, SymmetricKeyAlgorithm::AES256];

    for size in sizes {
        for sym_alg in sym_algs {
            for hash_alg in algs {
                for count in counts {
                    let s2k = StringToKey::IteratedAndSalted {
                        hash_alg,
                        salt: rng.gen(),
                        count,
                    };
                    let passphrase = Alphanumeric.sample_string(&mut rng, size);

                    group.bench_with_input(
                        BenchmarkId::new(
                            "iterated_and_salted",
                            format!("{size}/{hash_alg:?}/{count}/{sym_alg:?}"),
                        ),
                        &(s2k, passphrase),
                        |b, (s2k, passphrase)| {
                            b.iter(|| {
                                let res = s2k
                                    .derive_key(passphrase.as_bytes(), sym_alg.key_size())
                                    .unwrap();
                                black_box(res);
                            })
                        },
                    );
                }
            }
        }
    }
    group.finish();
}

criterion_group!(benches, bench_s2k);
