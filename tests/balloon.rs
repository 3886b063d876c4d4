use balloon::Error;
use balloon::derivation::{
    BLOB_HASH_LEN, MixMethod, OUTLEN_MAX, OUTLEN_MIN, Options, hash, hash_password,
    verify_password,
};
use balloon::encoding::read_blob;
use balloon::hash::{Combination, Primitive};
use test_log::test;

const PASSWORD: &[u8] = b"hunter42";
const SALT: &[u8] = b"0123456789abcdef";

fn configs() -> Vec<Options> {
    let base = Options {
        m_cost: 32 * 1024,
        t_cost: 2,
        ..Options::default()
    };

    vec![
        Options {
            mix: MixMethod::SingleBuffer,
            ..base.clone()
        },
        Options {
            mix: MixMethod::DoubleBuffer,
            primitive: Primitive::Sha512,
            ..base.clone()
        },
        Options {
            mix: MixMethod::DoubleBuffer,
            combination: Combination::Xor,
            ..base.clone()
        },
        Options {
            mix: MixMethod::DoubleBufferPar,
            n_threads: 3,
            ..base.clone()
        },
        Options {
            mix: MixMethod::DoubleBufferPar,
            n_threads: 3,
            combination: Combination::Xor,
            ..base.clone()
        },
        Options {
            mix: MixMethod::DoubleBufferPipe,
            primitive: Primitive::ArgonPermutation,
            combination: Combination::Xor,
            m_cost: 64 * 1024,
            ..base.clone()
        },
        Options {
            mix: MixMethod::Argon2Uniform,
            primitive: Primitive::Argon,
            ..base.clone()
        },
        Options {
            mix: MixMethod::CatenaBrg,
            primitive: Primitive::Keccak1600,
            ..base.clone()
        },
        Options {
            mix: MixMethod::Scrypt,
            t_cost: 1,
            ..base.clone()
        },
    ]
}

fn digest(opts: &Options, password: &[u8], salt: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    hash(password, salt, opts, &mut out).unwrap();
    out
}

#[test]
fn output_is_deterministic() {
    for opts in configs() {
        assert_eq!(
            digest(&opts, PASSWORD, SALT),
            digest(&opts, PASSWORD, SALT),
            "{}",
            opts.mix
        );
    }
}

#[test]
fn output_depends_on_password_and_salt() {
    for opts in configs() {
        let reference = digest(&opts, PASSWORD, SALT);
        assert_ne!(reference, digest(&opts, b"hunter43", SALT), "{}", opts.mix);
        assert_ne!(reference, digest(&opts, PASSWORD, b"0123456789abcdeg"), "{}", opts.mix);
    }
}

#[test]
fn strategies_produce_distinct_outputs() {
    let outputs: Vec<[u8; 32]> = configs().iter().map(|o| digest(o, PASSWORD, SALT)).collect();
    for (i, a) in outputs.iter().enumerate() {
        for b in &outputs[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn parallel_output_depends_on_thread_count() {
    let opts = Options {
        m_cost: 32 * 1024,
        t_cost: 1,
        mix: MixMethod::DoubleBufferPar,
        ..Options::default()
    };
    let two = digest(&Options { n_threads: 2, ..opts.clone() }, PASSWORD, SALT);
    let four = digest(&Options { n_threads: 4, ..opts.clone() }, PASSWORD, SALT);

    assert_eq!(two, digest(&Options { n_threads: 2, ..opts }, PASSWORD, SALT));
    assert_ne!(two, four);
}

#[test]
fn length_limits_are_enforced() {
    let opts = Options {
        m_cost: 16 * 1024,
        t_cost: 1,
        ..Options::default()
    };

    let mut short = [0u8; OUTLEN_MIN - 1];
    assert_eq!(
        hash(PASSWORD, SALT, &opts, &mut short),
        Err(Error::OutputTooShort)
    );
    let mut long = [0u8; OUTLEN_MAX];
    assert_eq!(
        hash(PASSWORD, SALT, &opts, &mut long),
        Err(Error::OutputTooLong)
    );

    let mut out = [0u8; OUTLEN_MIN];
    assert_eq!(
        hash(b"abc", SALT, &opts, &mut out),
        Err(Error::PasswordTooShort)
    );
    assert_eq!(
        hash(PASSWORD, b"abc", &opts, &mut out),
        Err(Error::SaltTooShort)
    );
    hash(b"abcd", b"abcd", &opts, &mut out).unwrap();
}

#[test]
fn output_length_changes_only_the_tail() {
    let opts = Options {
        m_cost: 16 * 1024,
        t_cost: 1,
        ..Options::default()
    };
    let mut a = [0u8; 16];
    let mut b = [0u8; 64];
    hash(PASSWORD, SALT, &opts, &mut a).unwrap();
    hash(PASSWORD, SALT, &opts, &mut b).unwrap();
    assert_eq!(a[..], b[..16]);
}

#[test]
fn invalid_options_are_reported() {
    let opts = Options {
        mix: MixMethod::Scrypt,
        t_cost: 3,
        ..Options::default()
    };
    let mut out = [0u8; 32];
    assert_eq!(
        hash(PASSWORD, SALT, &opts, &mut out),
        Err(Error::TCostTooBig)
    );
}

fn fast() -> Options {
    Options {
        m_cost: 16 * 1024,
        t_cost: 1,
        ..Options::default()
    }
}

#[test]
fn hash_then_verify() {
    let opts = fast();
    let blob = hash_password(PASSWORD, &opts).unwrap();
    assert!(blob.starts_with("$balloon$v=1$s=16384,t=1,p=1$"));

    let parsed = read_blob(&blob).unwrap();
    assert_eq!(parsed.hash.len(), BLOB_HASH_LEN);

    assert_eq!(verify_password(&blob, PASSWORD, &opts), Ok(true));
    assert_eq!(verify_password(&blob, b"hunter43", &opts), Ok(false));
}

#[test]
fn hash_password_salts_every_call() {
    let opts = fast();
    let a = hash_password(PASSWORD, &opts).unwrap();
    let b = hash_password(PASSWORD, &opts).unwrap();
    assert_ne!(a, b);
    assert_eq!(verify_password(&b, PASSWORD, &opts), Ok(true));
}

#[test]
fn verify_uses_costs_from_blob() {
    let stored = hash_password(PASSWORD, &fast()).unwrap();
    let other = Options {
        m_cost: 1024 * 1024,
        t_cost: 5,
        ..Options::default()
    };
    assert_eq!(verify_password(&stored, PASSWORD, &other), Ok(true));
}

#[test]
fn verify_needs_matching_strategy() {
    let stored = hash_password(PASSWORD, &fast()).unwrap();
    let single = Options {
        mix: MixMethod::SingleBuffer,
        ..fast()
    };
    assert_eq!(verify_password(&stored, PASSWORD, &single), Ok(false));
}

#[test]
fn verify_rejects_malformed_blobs() {
    let opts = fast();
    for blob in [
        "",
        "$balloon$v=1$s=16384,t=1,p=1$",
        "$argon2$v=1$s=16384,t=1,p=1$YmxhaA==$YmxhaA==",
        "$balloon$v=1$s=16384,t=1,p=1$YmxhaA==$!!!!",
        // digest shorter than the minimum output length
        "$balloon$v=1$s=16384,t=1,p=1$YmxhaA==$YmxhaA==",
    ] {
        assert_eq!(verify_password(blob, PASSWORD, &opts), Err(Error::Parse), "{blob}");
    }
}
