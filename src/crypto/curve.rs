//! secp256k1 point and scalar arithmetic used by the VRF
//!
//! Points are kept affine and never equal to the identity. Every scalar is
//! reduced modulo the group order before it touches a point, since values
//! coming out of keccak are allowed to exceed it.

use crate::crypto::hash::{bytes_to_hash, HASH_LENGTH};
use crate::error::{CryptoError, Result};
use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::bigint::U256;
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar};
use num_bigint::BigUint;
use std::fmt;

/// Field prime `p` of secp256k1
pub const FIELD_SIZE: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

/// Order `n` of the group generated by `G`
pub const GROUP_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b,
    0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

pub const GENERATOR_X: [u8; 32] = [
    0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac,
    0x55, 0xa0, 0x62, 0x95, 0xce, 0x87, 0x0b, 0x07,
    0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9,
    0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98,
];

pub const GENERATOR_Y: [u8; 32] = [
    0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65,
    0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11, 0x08, 0xa8,
    0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19,
    0x9c, 0x47, 0xd0, 0x8f, 0xfb, 0x10, 0xd4, 0xb8,
];

/// Curve equation constant: y² = x³ + 7
const CURVE_B: u32 = 7;

/// An affine secp256k1 point that is on the curve and not the identity.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint {
    affine: AffinePoint,
    x: [u8; 32],
    y: [u8; 32],
}

impl CurvePoint {
    /// Build a point from 32-byte big-endian coordinates, rejecting anything off the curve.
    pub fn from_bytes(x: &[u8; 32], y: &[u8; 32]) -> Result<Self> {
        let encoded = EncodedPoint::from_affine_coordinates(
            FieldBytes::from_slice(x),
            FieldBytes::from_slice(y),
            false,
        );
        let affine: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
        let affine = affine.ok_or_else(|| CryptoError::InvalidPoint {
            reason: format!(
                "point requested from invalid coordinates ({}, {})",
                hex::encode(x),
                hex::encode(y)
            ),
        })?;
        Ok(Self {
            affine,
            x: *x,
            y: *y,
        })
    }

    /// Build a point from integer coordinates.
    pub fn from_coordinates(x: &BigUint, y: &BigUint) -> Result<Self> {
        if x.bits() > 256 || y.bits() > 256 {
            return Err(CryptoError::InvalidPoint {
                reason: "coordinate wider than 256 bits".to_string(),
            }
            .into());
        }
        Self::from_bytes(&bytes_to_hash(&x.to_bytes_be()), &bytes_to_hash(&y.to_bytes_be()))
    }

    /// The secp256k1 base point `G`
    pub fn generator() -> Self {
        Self {
            affine: AffinePoint::GENERATOR,
            x: GENERATOR_X,
            y: GENERATOR_Y,
        }
    }

    pub(crate) fn from_projective(point: ProjectivePoint) -> Result<Self> {
        if bool::from(point.is_identity()) {
            return Err(CryptoError::PointAtInfinity.into());
        }
        let affine = AffinePoint::from(point);
        let encoded = affine.to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => Ok(Self {
                affine,
                x: bytes_to_hash(x),
                y: bytes_to_hash(y),
            }),
            _ => Err(CryptoError::PointAtInfinity.into()),
        }
    }

    pub(crate) fn to_projective(&self) -> ProjectivePoint {
        ProjectivePoint::from(self.affine)
    }

    /// x coordinate as fixed-width big-endian bytes
    pub fn x_bytes(&self) -> &[u8; 32] {
        &self.x
    }

    /// y coordinate as fixed-width big-endian bytes
    pub fn y_bytes(&self) -> &[u8; 32] {
        &self.y
    }

    pub fn x(&self) -> BigUint {
        BigUint::from_bytes_be(&self.x)
    }

    pub fn y(&self) -> BigUint {
        BigUint::from_bytes_be(&self.y)
    }

    /// `x ‖ y`, each coordinate exactly 32 bytes
    pub fn to_bytes(&self) -> [u8; 2 * HASH_LENGTH] {
        let mut out = [0u8; 2 * HASH_LENGTH];
        out[..HASH_LENGTH].copy_from_slice(&self.x);
        out[HASH_LENGTH..].copy_from_slice(&self.y);
        out
    }

    pub fn has_odd_y(&self) -> bool {
        self.y[HASH_LENGTH - 1] & 1 == 1
    }

    pub fn negate(&self) -> Self {
        let p = BigUint::from_bytes_be(&FIELD_SIZE);
        let neg_y = (&p - self.y()) % &p;
        Self {
            affine: AffinePoint::from(-self.to_projective()),
            x: self.x,
            y: bytes_to_hash(&neg_y.to_bytes_be()),
        }
    }

    /// Re-check the curve equation on the stored coordinates
    pub fn is_valid(&self) -> bool {
        Self::from_bytes(&self.x, &self.y).is_ok()
    }
}

impl fmt::Debug for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{x:{}, y:{}}}", hex::encode(self.x), hex::encode(self.y))
    }
}

impl fmt::Display for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(0x{}, 0x{})", hex::encode(self.x), hex::encode(self.y))
    }
}

/// True iff `(x, y)` lies on the curve and is not the identity
pub fn is_valid_point(x: &BigUint, y: &BigUint) -> bool {
    CurvePoint::from_coordinates(x, y).is_ok()
}

/// Process-wide curve constants, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct CurveParams {
    pub field_size: BigUint,
    pub group_order: BigUint,
    pub cofactor: u32,
    pub generator: CurvePoint,
    /// (p - 1) / 2
    euler_criterion_power: BigUint,
    /// (p + 1) / 4, valid because p ≡ 3 mod 4
    sqrt_power: BigUint,
    pub hash_to_curve_prefix: [u8; 32],
    pub scalar_from_curve_prefix: [u8; 32],
    pub output_prefix: [u8; 32],
}

impl CurveParams {
    pub fn secp256k1() -> Self {
        let field_size = BigUint::from_bytes_be(&FIELD_SIZE);
        let one = BigUint::from(1u32);
        let euler_criterion_power = (&field_size - &one) >> 1;
        let sqrt_power = (&field_size + &one) >> 2;

        Self {
            group_order: BigUint::from_bytes_be(&GROUP_ORDER),
            cofactor: 1,
            generator: CurvePoint::generator(),
            euler_criterion_power,
            sqrt_power,
            hash_to_curve_prefix: domain_prefix(1),
            scalar_from_curve_prefix: domain_prefix(2),
            output_prefix: domain_prefix(3),
            field_size,
        }
    }

    /// `k mod n` as a curve scalar
    pub fn scalar(&self, k: &BigUint) -> Scalar {
        let reduced = k % &self.group_order;
        let bytes = bytes_to_hash(&reduced.to_bytes_be());
        <Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(&bytes))
    }

    /// `[k mod n]·p` in projective form; may be the identity.
    pub(crate) fn multiply(&self, k: &BigUint, p: &CurvePoint) -> ProjectivePoint {
        p.to_projective() * self.scalar(k)
    }

    /// `[k mod n]·p`, normalized
    pub fn scalar_mul(&self, k: &BigUint, p: &CurvePoint) -> Result<CurvePoint> {
        CurvePoint::from_projective(self.multiply(k, p))
    }

    /// `[c]·p1 + [s]·p2`, normalized
    pub fn linear_combination(
        &self,
        c: &BigUint,
        p1: &CurvePoint,
        s: &BigUint,
        p2: &CurvePoint,
    ) -> Result<CurvePoint> {
        CurvePoint::from_projective(self.multiply(c, p1) + self.multiply(s, p2))
    }

    /// x³ + 7 mod p
    pub fn y_squared(&self, x: &BigUint) -> BigUint {
        (x.modpow(&BigUint::from(3u32), &self.field_size) + CURVE_B) % &self.field_size
    }

    /// Euler's criterion: x^((p-1)/2) ≡ 1
    pub fn is_square(&self, x: &BigUint) -> bool {
        x.modpow(&self.euler_criterion_power, &self.field_size) == BigUint::from(1u32)
    }

    /// Whether `x` is the x coordinate of some curve point
    pub fn is_curve_x_ordinate(&self, x: &BigUint) -> bool {
        self.is_square(&self.y_squared(x))
    }

    /// A square root of `x`, meaningful only when `x` is a square
    pub fn square_root(&self, x: &BigUint) -> BigUint {
        x.modpow(&self.sqrt_power, &self.field_size)
    }
}

impl Default for CurveParams {
    fn default() -> Self {
        Self::secp256k1()
    }
}

fn domain_prefix(tag: u8) -> [u8; 32] {
    bytes_to_hash(&[tag])
}
