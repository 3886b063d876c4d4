use balloon::Error;
use balloon::derivation::{HashState, MCOST_MAX, MixMethod, Options};
use balloon::hash::{Combination, Primitive};

const PASSWORD: &[u8] = b"correct horse";
const SALT: &[u8] = b"NaCl-and-pepper!";

/// Smallest runnable options for every strategy.
fn small(mix: MixMethod) -> Options {
    let mut opts = Options {
        m_cost: 16 * 1024,
        t_cost: 1,
        mix,
        ..Options::default()
    };
    match mix {
        MixMethod::DoubleBufferPipe => {
            opts.primitive = Primitive::ArgonPermutation;
            opts.combination = Combination::Xor;
            opts.m_cost = 64 * 1024;
        }
        MixMethod::DoubleBufferPar => opts.n_threads = 2,
        _ => {}
    }
    opts
}

#[test]
fn extract_before_mix_is_rejected() {
    for mix in MixMethod::ALL {
        let mut state = HashState::new(&small(mix), SALT).unwrap();
        state.fill(PASSWORD, SALT).unwrap();

        let mut out = [0u8; 32];
        assert_eq!(
            state.extract(&mut out),
            Err(Error::CannotExtractBeforeMix),
            "{mix}"
        );
        assert!(!state.has_mixed());

        state.mix().unwrap();
        assert!(state.has_mixed());
        state.extract(&mut out).unwrap();
    }
}

#[test]
fn extract_is_repeatable() {
    for mix in MixMethod::ALL {
        let mut state = HashState::new(&small(mix), SALT).unwrap();
        state.fill(PASSWORD, SALT).unwrap();
        state.mix().unwrap();

        let mut a = [0u8; 24];
        let mut b = [0u8; 24];
        state.extract(&mut a).unwrap();
        state.extract(&mut b).unwrap();
        assert_eq!(a, b, "{mix}");
    }
}

#[test]
fn block_count_is_even() {
    for mix in MixMethod::ALL {
        let opts = Options {
            m_cost: 64 * 33,
            ..small(mix)
        };
        let opts = match mix {
            MixMethod::DoubleBufferPipe => Options {
                m_cost: 1024 * 41,
                ..opts
            },
            _ => opts,
        };
        let state = HashState::new(&opts, SALT).unwrap();
        assert_eq!(state.n_blocks() % 2, 0, "{mix}");
        assert_eq!(state.buffer().len(), state.n_blocks() * state.block_size());
    }
}

#[test]
fn catena_block_count_is_a_power_of_two() {
    for m_cost in [64 * 32, 64 * 40, 64 * 100, 64 * 1000] {
        let opts = Options {
            m_cost,
            ..small(MixMethod::CatenaBrg)
        };
        let state = HashState::new(&opts, SALT).unwrap();
        assert!(state.n_blocks().is_power_of_two(), "{m_cost}");
        assert!(state.n_blocks() as u64 <= opts.n_blocks().max(32));
    }
}

#[test]
fn invalid_options_fail_before_allocation() {
    let opts = Options {
        t_cost: 2,
        ..small(MixMethod::Scrypt)
    };
    assert!(matches!(
        HashState::new(&opts, SALT),
        Err(Error::TCostTooBig)
    ));
}

#[test]
fn state_reports_normalized_options() {
    let opts = Options {
        t_cost: 0,
        n_neighbors: 0,
        ..small(MixMethod::SingleBuffer)
    };
    let state = HashState::new(&opts, SALT).unwrap();
    assert_eq!(state.options().t_cost, 1);
    assert_eq!(state.options().n_neighbors, 20);
}

fn equal_blocks(a: &[u8], b: &[u8], bs: usize) -> usize {
    a.chunks(bs).zip(b.chunks(bs)).filter(|(x, y)| x == y).count()
}

#[test]
fn fill_diffuses_the_salt() {
    let opts = Options {
        m_cost: 64 * 1024,
        ..small(MixMethod::SingleBuffer)
    };

    let mut a = HashState::new(&opts, b"salt-one").unwrap();
    let mut b = HashState::new(&opts, b"salt-two").unwrap();
    a.fill(PASSWORD, b"salt-one").unwrap();
    b.fill(PASSWORD, b"salt-two").unwrap();

    let bs = a.block_size();
    let same = equal_blocks(a.buffer(), b.buffer(), bs);
    assert!(same * 100 < a.n_blocks(), "{same} equal blocks");
}

#[test]
fn double_fill_diffuses_the_password() {
    let opts = Options {
        m_cost: 64 * 1024,
        ..small(MixMethod::DoubleBuffer)
    };

    let mut a = HashState::new(&opts, SALT).unwrap();
    let mut b = HashState::new(&opts, SALT).unwrap();
    a.fill(b"password-1", SALT).unwrap();
    b.fill(b"password-2", SALT).unwrap();

    let bs = a.block_size();
    let half = a.n_blocks() / 2 * bs;
    let same = equal_blocks(&a.buffer()[..half], &b.buffer()[..half], bs);
    assert!(same * 100 < a.n_blocks() / 2, "{same} equal blocks");
}

#[test]
fn each_pass_changes_the_output() {
    for mix in [
        MixMethod::SingleBuffer,
        MixMethod::DoubleBuffer,
        MixMethod::Argon2Uniform,
        MixMethod::CatenaBrg,
    ] {
        let opts = small(mix);
        let mut state = HashState::new(&opts, SALT).unwrap();
        state.fill(PASSWORD, SALT).unwrap();

        state.mix().unwrap();
        let mut first = [0u8; 32];
        state.extract(&mut first).unwrap();

        state.mix().unwrap();
        let mut second = [0u8; 32];
        state.extract(&mut second).unwrap();

        assert_ne!(first, second, "{mix}");
    }
}

#[test]
fn refused_allocation_is_an_error() {
    let opts = Options {
        m_cost: MCOST_MAX - 1,
        ..small(MixMethod::DoubleBuffer)
    };
    assert!(matches!(HashState::new(&opts, SALT), Err(Error::Alloc)));
}

#[test]
fn argon2_pass_with_argon_primitive_keeps_entropy() {
    let opts = Options {
        primitive: Primitive::Argon,
        ..small(MixMethod::Argon2Uniform)
    };

    let mut a = HashState::new(&opts, SALT).unwrap();
    a.fill(PASSWORD, SALT).unwrap();
    a.mix().unwrap();
    assert!(a.buffer().iter().any(|&b| b != 0), "buffer zeroed by mixing");

    let mut b = HashState::new(&opts, SALT).unwrap();
    b.fill(b"another password", SALT).unwrap();
    b.mix().unwrap();

    let bs = a.block_size();
    let same = equal_blocks(a.buffer(), b.buffer(), bs);
    assert_eq!(same, 0, "{same} blocks independent of the password");
}
