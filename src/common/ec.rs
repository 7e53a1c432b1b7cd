use std::sync::{Mutex, PoisonError};

use lazy_static::lazy_static;

use super::error::{QRError, QRResult};

// Galois field arithmetic
//------------------------------------------------------------------------------

// GF(256) reducing polynomial: x^8 + x^4 + x^3 + x^2 + 1
const GF256_POLY: u16 = 0x11D;

lazy_static! {
    static ref EXP_TABLE: [u8; 256] = {
        let mut table = [0u8; 256];
        table[0] = 1;
        for i in 1..256 {
            let mut n = (table[i - 1] as u16) << 1;
            if n > 255 {
                n ^= GF256_POLY;
            }
            table[i] = n as u8;
        }
        table
    };
    static ref LOG_TABLE: [u8; 256] = {
        let mut table = [0u8; 256];
        for i in 0..255 {
            table[EXP_TABLE[i] as usize] = i as u8;
        }
        table
    };
}

/// α^k, with k normalized into [0, 255) since α has multiplicative order 255.
pub(crate) fn exp(k: i32) -> u8 {
    EXP_TABLE[k.rem_euclid(255) as usize]
}

/// log_α(v). Zero has no logarithm.
pub(crate) fn log(v: u8) -> QRResult<u8> {
    if v == 0 {
        return Err(QRError::InvalidArgument);
    }
    Ok(LOG_TABLE[v as usize])
}

// Generator polynomials
//------------------------------------------------------------------------------

lazy_static! {
    // Memoized log-domain coefficients, indexed by degree. Append-only.
    static ref POLYNOMIALS: Mutex<Vec<Vec<u8>>> =
        Mutex::new(vec![vec![0], vec![0, 0], vec![0, 25, 1]]);
}

/// Coefficients (as exponents) of the degree-n generator polynomial
/// g(x) = (x - α^0)(x - α^1)...(x - α^(n-1)).
pub(crate) fn generator_polynomial(n: usize) -> QRResult<Vec<u8>> {
    let mut cache = POLYNOMIALS.lock().unwrap_or_else(PoisonError::into_inner);

    while cache.len() <= n {
        let num = cache.len();
        let prev = &cache[num - 1];

        let mut res = Vec::with_capacity(num + 1);
        res.push(prev[0]);
        for i in 1..=num {
            let a = if i < prev.len() { exp(prev[i] as i32) } else { 0 };
            let b = exp(prev[i - 1] as i32 + num as i32 - 1);
            res.push(log(a ^ b)?);
        }
        cache.push(res);
    }

    Ok(cache[n].clone())
}

// Error correction coder
//------------------------------------------------------------------------------

/// Remainder of the message polynomial divided by the degree-`ec_len`
/// generator polynomial: the error correction codewords for one block.
pub(crate) fn error_code(message: &[u8], ec_len: usize) -> QRResult<Vec<u8>> {
    let poly = generator_polynomial(ec_len)?;

    let mut msg = message.to_vec();
    msg.resize(message.len() + ec_len, 0);

    let mut head = 0;
    while msg.len() - head > ec_len {
        let lead = msg[head];
        if lead == 0 {
            head += 1;
            continue;
        }

        let log_lead = log(lead)? as i32;
        for (m, &g) in msg[head..=head + ec_len].iter_mut().zip(poly.iter()) {
            *m ^= exp(g as i32 + log_lead);
        }
        head += 1;
    }

    Ok(msg.split_off(head))
}

#[cfg(test)]
mod ec_tests {
    use super::{error_code, exp, generator_polynomial, log};
    use crate::common::error::QRError;

    #[test]
    fn test_exp_log_tables() {
        assert_eq!(exp(0), 1);
        assert_eq!(exp(1), 2);
        assert_eq!(exp(8), 29);
        assert_eq!(exp(255), 1);
        assert_eq!(exp(-1), exp(254));
        for k in 1..=255u8 {
            assert_eq!(exp(log(k).unwrap() as i32), k);
        }
    }

    #[test]
    fn test_log_of_zero() {
        assert_eq!(log(0), Err(QRError::InvalidArgument));
    }

    #[test]
    fn test_generator_polynomial_seeds() {
        assert_eq!(generator_polynomial(0).unwrap(), vec![0]);
        assert_eq!(generator_polynomial(1).unwrap(), vec![0, 0]);
        assert_eq!(generator_polynomial(2).unwrap(), vec![0, 25, 1]);
    }

    #[test]
    fn test_generator_polynomial_10() {
        let exp_poly = vec![0, 251, 67, 46, 61, 118, 70, 64, 94, 32, 45];
        assert_eq!(generator_polynomial(10).unwrap(), exp_poly);
    }

    #[test]
    fn test_error_code_simple() {
        let res = error_code(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11", 10).unwrap();
        assert_eq!(&*res, b"\xc4#'w\xeb\xd7\xe7\xe2]\x17");
    }

    #[test]
    fn test_error_code_uneven() {
        let res = error_code(b" [\x0bx\xd1r\xdcMC@\xec\x11\xec", 13).unwrap();
        assert_eq!(&*res, b"\xa8H\x16R\xd96\x9c\x00.\x0f\xb4z\x10");
    }

    #[test]
    fn test_error_code_complex() {
        let res = error_code(b"CUF\x86W&U\xc2w2\x06\x12\x06g&", 18).unwrap();
        assert_eq!(&*res, b"\xd5\xc7\x0b-s\xf7\xf1\xdf\xe5\xf8\x9au\x9aoV\xa1o'");
    }
}
