//! BN254 scalar-field arithmetic.
//!
//! The prime:
//! p = 21888242871839275222246405745257275088548364400416034343698204186575808495617
//!   = 0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001
//!
//! Every [`Fr`] holds a canonical representative in `[0, p)`; all operations
//! reduce on the way out, so no value outside that range can be observed.
//! Inputs and outputs cross the crate boundary as arbitrary-precision
//! integers (decimal or hex strings), matching what external circuit
//! evaluators consume.

use core::fmt::{self, Display};
use core::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

use crate::types::CoreError;

/// Decimal expansion of the BN254 scalar-field modulus.
pub const MODULUS_DEC: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// Number of bits in the modulus.
pub const MODULUS_BITS: u32 = 254;

/// The field modulus as a big integer, parsed once.
pub static MODULUS: Lazy<BigUint> = Lazy::new(|| {
    BigUint::parse_bytes(MODULUS_DEC.as_bytes(), 10).expect("modulus literal parses")
});

/// An element of the BN254 scalar field, always in canonical form.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fr(BigUint);

impl Fr {
    /// The additive identity.
    #[inline]
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// The multiplicative identity.
    #[inline]
    pub fn one() -> Self {
        Self(BigUint::one())
    }

    /// Create a new element from any big integer, reducing modulo p.
    #[inline]
    pub fn new(value: BigUint) -> Self {
        Self(value % &*MODULUS)
    }

    /// Create from a machine word.
    #[inline]
    pub fn from_u64(value: u64) -> Self {
        // u64 < p, no reduction needed
        Self(BigUint::from(value))
    }

    /// Parse a decimal string, reducing modulo p. Returns `None` on a
    /// malformed literal.
    pub fn from_dec_str(s: &str) -> Option<Self> {
        BigUint::parse_bytes(s.as_bytes(), 10).map(Self::new)
    }

    /// Parse a hex string (with or without a `0x` prefix), reducing modulo p.
    pub fn from_hex_str(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        BigUint::parse_bytes(digits.as_bytes(), 16).map(Self::new)
    }

    /// Interpret big-endian bytes as an integer and reduce modulo p.
    #[inline]
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self::new(BigUint::from_bytes_be(bytes))
    }

    /// Big-endian byte representation of the canonical value.
    #[inline]
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }

    /// Lowercase hex representation with a `0x` prefix, whole bytes.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.to_bytes_be()))
    }

    /// Decimal representation of the canonical value.
    pub fn to_dec_string(&self) -> String {
        self.0.to_str_radix(10)
    }

    /// Addition in the field.
    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        Self::new(&self.0 + &other.0)
    }

    /// Subtraction in the field.
    #[inline]
    pub fn sub(&self, other: &Self) -> Self {
        // both operands are canonical, so lhs + p - rhs never underflows
        Self::new(&self.0 + &*MODULUS - &other.0)
    }

    /// Multiplication in the field.
    #[inline]
    pub fn mul(&self, other: &Self) -> Self {
        Self::new(&self.0 * &other.0)
    }

    /// Squaring.
    #[inline]
    pub fn square(&self) -> Self {
        Self::new(&self.0 * &self.0)
    }

    /// The permutation S-box: x^5, computed as two squarings and one
    /// multiply. The round function depends on this exact sequence.
    #[inline]
    pub fn pow5(&self) -> Self {
        self.square().square().mul(self)
    }

    /// Negation in the field.
    #[inline]
    pub fn neg(&self) -> Self {
        if self.0.is_zero() {
            self.clone()
        } else {
            Self(&*MODULUS - &self.0)
        }
    }

    /// Multiplicative inverse via Fermat: a^(p-2) mod p.
    ///
    /// Fails with [`CoreError::DivisionByZero`] for the zero element.
    pub fn inv(&self) -> Result<Self, CoreError> {
        if self.0.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        let exp = &*MODULUS - BigUint::from(2u8);
        Ok(Self(self.0.modpow(&exp, &MODULUS)))
    }

    /// Division in the field (multiply by inverse).
    pub fn div(&self, other: &Self) -> Result<Self, CoreError> {
        Ok(self.mul(&other.inv()?))
    }

    /// Check if zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Borrow the canonical integer value.
    #[inline]
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

// === Operator implementations ===

// By-value trait impls are deliberately absent: they would shadow the
// inherent borrowing methods during method resolution on owned receivers.

impl Add<&Fr> for &Fr {
    type Output = Fr;
    #[inline]
    fn add(self, rhs: &Fr) -> Fr {
        Fr::add(self, rhs)
    }
}

impl AddAssign<&Fr> for Fr {
    #[inline]
    fn add_assign(&mut self, rhs: &Fr) {
        *self = Fr::add(self, rhs);
    }
}

impl Sub<&Fr> for &Fr {
    type Output = Fr;
    #[inline]
    fn sub(self, rhs: &Fr) -> Fr {
        Fr::sub(self, rhs)
    }
}

impl SubAssign<&Fr> for Fr {
    #[inline]
    fn sub_assign(&mut self, rhs: &Fr) {
        *self = Fr::sub(self, rhs);
    }
}

impl Mul<&Fr> for &Fr {
    type Output = Fr;
    #[inline]
    fn mul(self, rhs: &Fr) -> Fr {
        Fr::mul(self, rhs)
    }
}

impl MulAssign<&Fr> for Fr {
    #[inline]
    fn mul_assign(&mut self, rhs: &Fr) {
        *self = Fr::mul(self, rhs);
    }
}

impl Display for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Fr {
    #[inline]
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u32> for Fr {
    #[inline]
    fn from(value: u32) -> Self {
        Self::from_u64(value as u64)
    }
}
