use balloon::hash::{Combination, Primitive, block_size, compress};

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

pub fn bench_compress(c: &mut Criterion) {
    for primitive in Primitive::ALL {
        let bs = block_size(primitive);
        let inputs: Vec<Vec<u8>> = (0..21u8).map(|i| vec![i; bs]).collect();
        let refs: Vec<&[u8]> = inputs.iter().map(|b| b.as_slice()).collect();
        let mut out = vec![0u8; bs];

        for combination in [Combination::Hash, Combination::Xor] {
            c.bench_function(&format!("compress {primitive} {combination} 21 blocks"), |b| {
                b.iter(|| compress(&mut out, black_box(&refs), combination, primitive))
            });
        }
    }
}

criterion_group!(benches, bench_compress);
criterion_main!(benches);
