// src/common/types.rs

use core::fmt;

/// Largest float vector a single reply carries (rotation matrix, all-component data).
pub const MAX_FLOAT_FIELDS: usize = 9;
/// Largest integer vector a single reply carries (`GetStreamingSlots`).
pub const MAX_INTEGER_FIELDS: usize = 8;
/// Capacity for text replies such as the firmware version string.
pub const MAX_TEXT_LEN: usize = 64;

pub type FloatVector = heapless::Vec<f32, MAX_FLOAT_FIELDS>;
pub type IntegerVector = heapless::Vec<u32, MAX_INTEGER_FIELDS>;
pub type Text = heapless::String<MAX_TEXT_LEN>;

// --- Request arguments ---

/// A numeric request argument.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Numeric {
    Integer(u32),
    Float(f32),
}

impl From<u32> for Numeric {
    fn from(v: u32) -> Self {
        Numeric::Integer(v)
    }
}

impl From<u8> for Numeric {
    fn from(v: u8) -> Self {
        Numeric::Integer(v as u32)
    }
}

impl From<f32> for Numeric {
    fn from(v: f32) -> Self {
        Numeric::Float(v)
    }
}

// --- Orientation values ---

/// Orientation quaternion in the device's wire order (x, y, z, w).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn to_array(&self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

/// Euler angles in radians, in the device's wire order (pitch, yaw, roll).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct EulerAngles {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl EulerAngles {
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }
}

// --- Decoded replies ---

/// A reply decoded against the shape its command declares.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Float(f32),
    FloatVector(FloatVector),
    Quaternion(Quaternion),
    EulerAngles(EulerAngles),
    IntegerEnum(u32),
    IntegerVector(IntegerVector),
    Text(Text),
}

impl DecodedValue {
    /// Number of wire fields this value occupies.
    pub fn field_count(&self) -> usize {
        match self {
            DecodedValue::Float(_) | DecodedValue::IntegerEnum(_) | DecodedValue::Text(_) => 1,
            DecodedValue::FloatVector(v) => v.len(),
            DecodedValue::Quaternion(_) => 4,
            DecodedValue::EulerAngles(_) => 3,
            DecodedValue::IntegerVector(v) => v.len(),
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            DecodedValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            DecodedValue::FloatVector(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Three-component vector replies (gyro, accelerometer, compass).
    pub fn as_vector3(&self) -> Option<[f32; 3]> {
        match self.as_floats()? {
            [x, y, z] => Some([*x, *y, *z]),
            _ => None,
        }
    }

    pub fn as_quaternion(&self) -> Option<Quaternion> {
        match self {
            DecodedValue::Quaternion(q) => Some(*q),
            _ => None,
        }
    }

    pub fn as_euler(&self) -> Option<EulerAngles> {
        match self {
            DecodedValue::EulerAngles(e) => Some(*e),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u32> {
        match self {
            DecodedValue::IntegerEnum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integers(&self) -> Option<&[u32]> {
        match self {
            DecodedValue::IntegerVector(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// --- Session phase (for error reporting) ---

/// Coarse session state, without payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionPhase {
    Idle,
    AwaitingResponse,
    Streaming,
}

// --- Device configuration values ---

/// Euler angle decomposition order (`:16,n` / `:156`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum EulerDecompositionOrder {
    Xyz = 0,
    Yzx = 1,
    Zxy = 2,
    Zyx = 3,
    Xzy = 4,
    Yxz = 5,
}

impl EulerDecompositionOrder {
    /// Tries to convert a device code into an order.
    pub fn from_code(value: u32) -> Option<Self> {
        match value {
            0 => Some(EulerDecompositionOrder::Xyz),
            1 => Some(EulerDecompositionOrder::Yzx),
            2 => Some(EulerDecompositionOrder::Zxy),
            3 => Some(EulerDecompositionOrder::Zyx),
            4 => Some(EulerDecompositionOrder::Xzy),
            5 => Some(EulerDecompositionOrder::Yxz),
            _ => None,
        }
    }

    #[inline]
    pub const fn code(&self) -> u32 {
        *self as u32
    }
}

impl fmt::Display for EulerDecompositionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EulerDecompositionOrder::Xyz => "XYZ",
            EulerDecompositionOrder::Yzx => "YZX",
            EulerDecompositionOrder::Zxy => "ZXY",
            EulerDecompositionOrder::Zyx => "ZYX",
            EulerDecompositionOrder::Xzy => "XZY",
            EulerDecompositionOrder::Yxz => "YXZ",
        };
        f.write_str(name)
    }
}

/// Gyro/accelerometer calibration mode (`:169,n` / `:170`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum CalibrationMode {
    Bias = 0,
    ScaleBias = 1,
}

impl CalibrationMode {
    pub fn from_code(value: u32) -> Option<Self> {
        match value {
            0 => Some(CalibrationMode::Bias),
            1 => Some(CalibrationMode::ScaleBias),
            _ => None,
        }
    }

    #[inline]
    pub const fn code(&self) -> u32 {
        *self as u32
    }
}

/// Axis direction code (`:116,n` / `:143`).
///
/// The low three bits select an axis permutation and bits 3..=5 negate
/// individual axes; the driver only needs the two presets below.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AxisDirections(pub u8);

impl AxisDirections {
    /// East-North-Up, as expected by ROS-style consumers.
    pub const ENU: AxisDirections = AxisDirections(8);
    /// Factory default.
    pub const DEFAULT: AxisDirections = AxisDirections(5);

    pub fn from_code(value: u32) -> Option<Self> {
        u8::try_from(value).ok().map(AxisDirections)
    }

    #[inline]
    pub const fn code(&self) -> u32 {
        self.0 as u32
    }
}

impl Default for AxisDirections {
    fn default() -> Self {
        AxisDirections::DEFAULT
    }
}
