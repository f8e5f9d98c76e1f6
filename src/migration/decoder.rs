//! Result Decoder
//!
//! Reads the peeked BPT amount out of a static call of a peek-enabled
//! multicall. The peek is either the last entry or, when a restake follows
//! it, the one before.

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::SolValue;
use tracing::debug;

use crate::error::{MigrationError, MigrationResult};
use crate::relayer::decode_multicall_results;

/// `amount / SLIPPAGE_DIVISOR` is held back when a swap step ran (0.0001%)
const SLIPPAGE_DIVISOR: u64 = 1_000_000;

/// Multicall lengths that can only occur with a batch swap before the peek
const SWAP_ENTRY_COUNTS: [usize; 2] = [4, 6];

/// A peek returns one ABI word
const PEEK_RESULT_LEN: usize = 32;

pub fn decode_min_bpt_out(return_data: &[u8]) -> MigrationResult<U256> {
    let results = decode_multicall_results(return_data)?;
    if results.len() < 2 {
        return Err(MigrationError::DecodeError(format!(
            "expected at least 2 multicall results, got {}",
            results.len()
        )));
    }

    let tail = &results[results.len() - 2..];
    let non_empty: Vec<&Bytes> = tail.iter().filter(|r| !r.is_empty()).collect();
    let [peeked] = non_empty.as_slice() else {
        return Err(MigrationError::DecodeError(format!(
            "expected exactly one peeked value in the last two results, got {}",
            non_empty.len()
        )));
    };

    if peeked.len() != PEEK_RESULT_LEN {
        return Err(MigrationError::DecodeError(format!(
            "peeked value must be a {}-byte word, got {} bytes",
            PEEK_RESULT_LEN,
            peeked.len()
        )));
    }

    let amount = U256::abi_decode(&peeked[..])
        .map_err(|e| MigrationError::DecodeError(format!("peeked value: {}", e)))?;

    if SWAP_ENTRY_COUNTS.contains(&results.len()) {
        let buffered = amount - amount / U256::from(SLIPPAGE_DIVISOR);
        debug!("Peeked {} BPT, {} after swap buffer", amount, buffered);
        Ok(buffered)
    } else {
        debug!("Peeked {} BPT", amount);
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::I256;

    fn uint(value: u64) -> Bytes {
        U256::from(value).abi_encode().into()
    }

    fn multicall_return(results: Vec<Bytes>) -> Vec<u8> {
        results.abi_encode()
    }

    #[test]
    fn test_swap_results_are_buffered() {
        // exit, swap, join, peek
        let data = multicall_return(vec![
            Bytes::new(),
            uint(7),
            Bytes::new(),
            uint(1_000_000_000),
        ]);
        assert_eq!(decode_min_bpt_out(&data).unwrap(), U256::from(999_999_000u64));

        // unstake, exit, swap, join, peek, restake
        let data = multicall_return(vec![
            Bytes::new(),
            Bytes::new(),
            uint(7),
            Bytes::new(),
            uint(2_000_000),
            Bytes::new(),
        ]);
        assert_eq!(decode_min_bpt_out(&data).unwrap(), U256::from(1_999_998u64));
    }

    #[test]
    fn test_plain_results_are_not_buffered() {
        // exit, join, peek
        let data = multicall_return(vec![Bytes::new(), Bytes::new(), uint(1_000_000_000)]);
        assert_eq!(decode_min_bpt_out(&data).unwrap(), U256::from(1_000_000_000u64));

        // unstake, exit, join, peek, restake
        let data = multicall_return(vec![
            Bytes::new(),
            Bytes::new(),
            Bytes::new(),
            uint(42),
            Bytes::new(),
        ]);
        assert_eq!(decode_min_bpt_out(&data).unwrap(), U256::from(42u64));
    }

    #[test]
    fn test_decoding_is_idempotent() {
        let data = multicall_return(vec![Bytes::new(), uint(7), Bytes::new(), uint(123_456_789)]);
        assert_eq!(decode_min_bpt_out(&data), decode_min_bpt_out(&data));
    }

    #[test]
    fn test_malformed_results_are_rejected() {
        // unstake, exit, swap, join built without a peek: the swap deltas sit in the tail
        let deltas: Bytes = vec![I256::try_from(-5i64).unwrap(), I256::try_from(7i64).unwrap()]
            .abi_encode()
            .into();

        let cases = [
            multicall_return(vec![Bytes::new(), Bytes::new(), deltas, Bytes::new()]),
            multicall_return(vec![Bytes::new(), Bytes::new(), Bytes::new()]),
            multicall_return(vec![Bytes::new(), uint(1), uint(2)]),
            multicall_return(vec![uint(1)]),
            multicall_return(vec![Bytes::new(), Bytes::from(vec![0xab, 0xcd])]),
            vec![0xde, 0xad, 0xbe, 0xef],
        ];

        for data in cases {
            assert!(matches!(
                decode_min_bpt_out(&data),
                Err(MigrationError::DecodeError(_))
            ));
        }
    }
}
