#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use zjson::testing::{Data1, Data2};
use zjson::{Decoder, Encoder};

const HEADER: usize = 1; // flag byte

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[u8] = b" \t\n\r";

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

struct Model(Data1);

impl<'a> Arbitrary<'a> for Model {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut d = Vec::new();
        for _ in 0..u.int_in_range(0..=8)? {
            d.push(Data2::new(u.arbitrary()?, u.arbitrary()?, u.arbitrary()?, u.arbitrary()?));
        }
        Ok(Model(Data1 {
            b1: u.arbitrary()?,
            b2: u.arbitrary()?,
            i1: u.arbitrary()?,
            i2: u.arbitrary()?,
            i3: u.arbitrary()?,
            i4: u.arbitrary()?,
            f1: u.arbitrary()?,
            s1: u.arbitrary()?,
            s2: u.arbitrary()?,
            d,
        }))
    }
}

/// Most of the time, replace the input with a well-formed document so the
/// decoder gets past the first delimiter.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed % 4 != 0 {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        let doc = generate_document();
        let len = doc.len().min(max_size - HEADER);
        data[HEADER..HEADER + len].copy_from_slice(&doc[..len]);
        HEADER + len
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn generate_document() -> Vec<u8> {
    let model = loop {
        let bytes: Vec<u8> = with_rng(|rng| {
            let len = rng.random_range(16..512);
            (0..len).map(|_| rng.random::<u8>()).collect()
        });
        if let Ok(Model(model)) = Model::arbitrary(&mut Unstructured::new(&bytes)) {
            break model;
        }
    };

    let mut enc = Encoder::new();
    enc.object(&model);
    let mut out = Vec::new();
    for &b in enc.bytes() {
        let structural = matches!(b, b'{' | b'}' | b'[' | b']' | b',' | b':');
        if structural {
            append_whitespace(&mut out);
        }
        out.push(b);
        if structural {
            append_whitespace(&mut out);
        }
    }
    out
}

/// Appends zero to three JSON whitespace bytes.
fn append_whitespace(out: &mut Vec<u8>) {
    with_rng(|rng| {
        for _ in 0..rng.random_range(0..=3) {
            out.push(WS_TABLE[rng.random_range(0..WS_TABLE.len())]);
        }
    });
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn encode(model: &Data1) -> Vec<u8> {
    let mut enc = zjson::acquire_encoder(256);
    enc.object(model);
    enc.bytes().to_vec()
}

fn is_plain(s: &str) -> bool {
    !s.chars().any(char::is_control)
}

fn decoder(data: &[u8]) {
    let Some((&flags, data)) = data.split_first() else {
        return;
    };

    let mut first = Data1::default();
    let result = if flags & 1 == 0 {
        zjson::acquire_decoder(data).object(&mut first)
    } else {
        Decoder::new(data).object(&mut first)
    };
    if result.is_err() {
        return;
    }

    // Anything accepted once re-encodes to a stable document.
    let encoded = encode(&first);
    let mut second = Data1::default();
    zjson::acquire_decoder(&encoded)
        .object(&mut second)
        .unwrap_or_else(|err| panic!("re-decoding {:?}: {err}", String::from_utf8_lossy(&encoded)));
    assert_eq!(encode(&second), encoded);

    if first.f1.is_finite() && is_plain(&first.s1) && is_plain(&first.s2) {
        serde_json::from_slice::<serde_json::Value>(&encoded)
            .unwrap_or_else(|err| panic!("invalid json {:?}: {err}", String::from_utf8_lossy(&encoded)));
    }
}

fuzz_target!(|data: &[u8]| decoder(data));
