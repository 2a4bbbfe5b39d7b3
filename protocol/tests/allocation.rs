//! Allocation bounds for hostile length prefixes.
//!
//! A counting global allocator records the largest single request made while
//! decoding inputs whose prefixes claim far more elements than they carry.
//! Everything runs inside one test function so no other test thread can
//! raise the recorded peak.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

use relaytx_protocol::codec::{from_bytes, to_bytes, CodecError, Decode};
use relaytx_protocol::config::MAX_BYTES;
use relaytx_protocol::pack::{Typed, Value};
use relaytx_protocol::transaction::{Tx, Version};

// ---------------------------------------------------------------------------
// Counting allocator
// ---------------------------------------------------------------------------

struct PeakAlloc;

static LARGEST_REQUEST: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for PeakAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        LARGEST_REQUEST.fetch_max(layout.size(), Ordering::SeqCst);
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        LARGEST_REQUEST.fetch_max(layout.size(), Ordering::SeqCst);
        System.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        LARGEST_REQUEST.fetch_max(new_size, Ordering::SeqCst);
        System.realloc(ptr, layout, new_size)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: PeakAlloc = PeakAlloc;

/// Largest single allocation any of these decodes may request.
const ALLOCATION_CEILING: usize = 64 * 1024;

/// Runs `f` and returns the largest single allocation it requested.
fn largest_allocation<R>(f: impl FnOnce() -> R) -> (R, usize) {
    LARGEST_REQUEST.store(0, Ordering::SeqCst);
    let out = f();
    (out, LARGEST_REQUEST.load(Ordering::SeqCst))
}

fn assert_bounded<T: std::fmt::Debug>(what: &str, result: Result<T, CodecError>, peak: usize) {
    assert!(result.is_err(), "{what}: decoded {result:?}");
    assert!(peak < ALLOCATION_CEILING, "{what}: largest allocation was {peak} bytes");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn claimed_counts_do_not_drive_allocation() {
    // A list tag claiming u32::MAX elements with no elements behind it.
    let list = [0x0B, 0xFF, 0xFF, 0xFF, 0xFF];
    let (result, peak) = largest_allocation(|| Value::decode(&list, MAX_BYTES).map(|(v, ..)| v));
    assert_bounded("value list", result, peak);

    // A record claiming u32::MAX fields.
    let record = [0xFF, 0xFF, 0xFF, 0xFF];
    let (result, peak) =
        largest_allocation(|| Typed::decode(&record, MAX_BYTES).map(|(t, ..)| t));
    assert_bounded("typed record", result, peak);

    // A 59-byte transaction: zero hash, version, selector, then an input
    // claiming u32::MAX fields.
    let mut tx = vec![0u8; 32];
    tx.extend(to_bytes(&Version::V1).unwrap());
    tx.extend(to_bytes("BTC/toEthereum").unwrap());
    tx.extend([0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(tx.len(), 59);
    let (result, peak) = largest_allocation(|| from_bytes::<Tx>(&tx));
    assert_bounded("transaction input", result, peak);

    // A list nested in a struct field, both with absurd counts and a little
    // real data, so the reservation is bounded by the bytes present.
    let mut nested = vec![0xFF, 0xFF, 0xFF, 0xFF];
    nested.extend(to_bytes("f").unwrap());
    nested.extend([0x0B, 0xFF, 0xFF, 0xFF, 0xFF]);
    nested.extend([0u8; 256]);
    let (result, peak) =
        largest_allocation(|| Typed::decode(&nested, MAX_BYTES).map(|(t, ..)| t));
    assert_bounded("nested list", result, peak);

    // A byte field claiming most of the quota with three bytes behind it.
    let mut bytes_field = ((MAX_BYTES - 16) as u32).to_be_bytes().to_vec();
    bytes_field.extend(b"abc");
    let (result, peak) =
        largest_allocation(|| Vec::<u8>::decode(&bytes_field, MAX_BYTES).map(|(b, ..)| b));
    assert_bounded("byte field", result, peak);
}
