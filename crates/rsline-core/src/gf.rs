//! GF(2^8) arithmetic over the primitive polynomial 0x11d, generator α = 2.

/// Multiplicative order of the field.
pub(crate) const ORDER: usize = 255;

const PRIMITIVE_POLY: u16 = 0x11d;

/// Powers of α, stored twice so `EXP[log a + log b]` needs no reduction.
static EXP: [u8; 2 * ORDER] = build_exp();
/// Discrete log base α. `LOG[0]` is unused.
static LOG: [u8; ORDER + 1] = build_log();

const fn build_exp() -> [u8; 2 * ORDER] {
    let mut exp = [0u8; 2 * ORDER];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < ORDER {
        exp[i] = x as u8;
        exp[i + ORDER] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    exp
}

const fn build_log() -> [u8; ORDER + 1] {
    let exp = build_exp();
    let mut log = [0u8; ORDER + 1];
    let mut i = 0;
    while i < ORDER {
        log[exp[i] as usize] = i as u8;
        i += 1;
    }
    log
}

/// α^e.
#[inline]
pub(crate) fn exp(e: usize) -> u8 {
    EXP[e % ORDER]
}

#[inline]
pub(crate) fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        0
    } else {
        EXP[LOG[a as usize] as usize + LOG[b as usize] as usize]
    }
}

/// Multiplicative inverse; `None` for zero.
#[inline]
pub(crate) fn inv(a: u8) -> Option<u8> {
    (a != 0).then(|| EXP[ORDER - LOG[a as usize] as usize])
}

/// `a / b`; `None` when `b` is zero.
#[inline]
pub(crate) fn div(a: u8, b: u8) -> Option<u8> {
    inv(b).map(|b_inv| mul(a, b_inv))
}

/// Evaluates a polynomial stored highest power first (codeword order).
pub(crate) fn eval_high_first(poly: &[u8], x: u8) -> u8 {
    poly.iter().fold(0, |acc, &c| mul(acc, x) ^ c)
}

/// Evaluates a polynomial stored lowest power first (`poly[i]` is the `x^i` term).
pub(crate) fn eval_low_first(poly: &[u8], x: u8) -> u8 {
    poly.iter().rev().fold(0, |acc, &c| mul(acc, x) ^ c)
}
