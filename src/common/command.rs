//! YostLab 3-Space ASCII command catalog.
//!
//! Every logical operation the driver can issue maps to exactly one
//! [`WireTemplate`]: the decimal command code, the kinds of its arguments and
//! the shape of the reply. The table is a `match`, so adding a variant without
//! a catalog entry is a compile error.

use core::fmt;

/// Kind of a single request argument.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ArgKind {
    /// Plain decimal integer (`100000`).
    Integer,
    /// Decimal float, shortest representation (`0.5`).
    Float,
}

/// Expected layout of the reply to a command.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResponseShape {
    /// The device sends nothing back.
    None,
    /// One float.
    Float,
    /// `n` comma-separated floats (2..=9).
    FloatVector(u8),
    /// Four floats: x, y, z, w.
    Quaternion,
    /// Three floats: pitch, yaw, roll (radians).
    EulerAngles,
    /// One unsigned integer code.
    Integer,
    /// `n` comma-separated unsigned integers.
    IntegerVector(u8),
    /// The whole line as text.
    Text,
    /// One streaming frame laid out by the configured slots.
    StreamingBatch,
}

impl ResponseShape {
    /// Number of comma-separated fields a reply of this shape carries.
    ///
    /// Returns `None` for shapes whose width is not fixed by the shape alone
    /// (`Text`, `StreamingBatch`).
    pub const fn field_count(&self) -> Option<usize> {
        match self {
            ResponseShape::None => Some(0),
            ResponseShape::Float | ResponseShape::Integer => Some(1),
            ResponseShape::FloatVector(n) | ResponseShape::IntegerVector(n) => Some(*n as usize),
            ResponseShape::Quaternion => Some(4),
            ResponseShape::EulerAngles => Some(3),
            ResponseShape::Text | ResponseShape::StreamingBatch => None,
        }
    }

    /// Whether a reply is read back for this shape.
    #[inline]
    pub const fn expects_reply(&self) -> bool {
        !matches!(self, ResponseShape::None)
    }

    /// Whether this shape can occupy a streaming slot.
    #[inline]
    pub const fn is_float_data(&self) -> bool {
        matches!(
            self,
            ResponseShape::Float
                | ResponseShape::FloatVector(_)
                | ResponseShape::Quaternion
                | ResponseShape::EulerAngles
        )
    }
}

/// Catalog entry for one logical command.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WireTemplate {
    /// Decimal command code sent after the `:` start byte.
    pub code: u8,
    /// Declared argument kinds, in order. Its length is the arity.
    pub args: &'static [ArgKind],
    /// Shape of the reply.
    pub response: ResponseShape,
}

impl WireTemplate {
    #[inline]
    pub const fn arity(&self) -> usize {
        self.args.len()
    }
}

const NO_ARGS: &[ArgKind] = &[];
const ONE_INT: &[ArgKind] = &[ArgKind::Integer];
const THREE_INTS: &[ArgKind] = &[ArgKind::Integer; 3];
const EIGHT_INTS: &[ArgKind] = &[ArgKind::Integer; 8];
const THREE_FLOATS: &[ArgKind] = &[ArgKind::Float; 3];
const FOUR_FLOATS: &[ArgKind] = &[ArgKind::Float; 4];

/// Logical operations understood by the device.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LogicalCommand {
    // --- Orientation ---
    GetTaredOrientationAsQuaternion,
    GetTaredOrientationAsEulerAngles,
    GetTaredOrientationAsRotationMatrix,
    GetTaredOrientationAsAxisAngle,
    GetTaredOrientationAsTwoVector,
    GetDifferenceQuaternion,
    GetUntaredOrientationAsQuaternion,
    GetUntaredOrientationAsEulerAngles,
    GetUntaredOrientationAsRotationMatrix,
    GetUntaredOrientationAsAxisAngle,
    GetUntaredOrientationAsTwoVector,
    GetTaredTwoVectorInSensorFrame,
    GetUntaredTwoVectorInSensorFrame,

    // --- Corrected data ---
    GetAllCorrectedComponentSensorData,
    GetCorrectedGyroRate,
    GetCorrectedAccelerometerVector,
    GetCorrectedCompassVector,
    GetCorrectedLinearAccelerationInGlobalSpace,
    CorrectRawGyroData,
    CorrectRawAccelData,
    CorrectRawCompassData,

    // --- Other data ---
    GetTemperatureC,
    GetTemperatureF,
    GetConfidenceFactor,

    // --- Raw data ---
    GetAllRawComponentSensorData,
    GetRawGyroRate,
    GetRawAccelData,
    GetRawCompassData,

    // --- Streaming ---
    SetStreamingSlots,
    GetStreamingSlots,
    SetStreamingTiming,
    GetStreamingTiming,
    GetStreamingBatch,
    StartStreaming,
    StopStreaming,
    UpdateCurrentTimestamp,

    // --- Configuration reads ---
    GetMIModeEnabled,
    GetAxisDirection,
    GetFilterMode,
    GetEulerDecompositionOrder,

    // --- Configuration writes ---
    SetEulerAngleDecompositionOrder,
    OffsetWithCurrentOrientation,
    TareWithCurrentOrientation,
    TareWithQuaternion,
    SetMIModeEnabled,
    BeginMIModeFieldCalibration,
    SetAxisDirections,

    // --- Calibration ---
    BeginGyroAutoCalibration,
    SetCalibrationMode,
    GetCalibrationMode,

    // --- System ---
    GetFirmwareVersionString,
    RestoreFactorySettings,
    SoftwareReset,
}

impl LogicalCommand {
    /// Every command in the catalog, in code order within each group.
    pub const ALL: [LogicalCommand; 53] = [
        LogicalCommand::GetTaredOrientationAsQuaternion,
        LogicalCommand::GetTaredOrientationAsEulerAngles,
        LogicalCommand::GetTaredOrientationAsRotationMatrix,
        LogicalCommand::GetTaredOrientationAsAxisAngle,
        LogicalCommand::GetTaredOrientationAsTwoVector,
        LogicalCommand::GetDifferenceQuaternion,
        LogicalCommand::GetUntaredOrientationAsQuaternion,
        LogicalCommand::GetUntaredOrientationAsEulerAngles,
        LogicalCommand::GetUntaredOrientationAsRotationMatrix,
        LogicalCommand::GetUntaredOrientationAsAxisAngle,
        LogicalCommand::GetUntaredOrientationAsTwoVector,
        LogicalCommand::GetTaredTwoVectorInSensorFrame,
        LogicalCommand::GetUntaredTwoVectorInSensorFrame,
        LogicalCommand::GetAllCorrectedComponentSensorData,
        LogicalCommand::GetCorrectedGyroRate,
        LogicalCommand::GetCorrectedAccelerometerVector,
        LogicalCommand::GetCorrectedCompassVector,
        LogicalCommand::GetCorrectedLinearAccelerationInGlobalSpace,
        LogicalCommand::CorrectRawGyroData,
        LogicalCommand::CorrectRawAccelData,
        LogicalCommand::CorrectRawCompassData,
        LogicalCommand::GetTemperatureC,
        LogicalCommand::GetTemperatureF,
        LogicalCommand::GetConfidenceFactor,
        LogicalCommand::GetAllRawComponentSensorData,
        LogicalCommand::GetRawGyroRate,
        LogicalCommand::GetRawAccelData,
        LogicalCommand::GetRawCompassData,
        LogicalCommand::SetStreamingSlots,
        LogicalCommand::GetStreamingSlots,
        LogicalCommand::SetStreamingTiming,
        LogicalCommand::GetStreamingTiming,
        LogicalCommand::GetStreamingBatch,
        LogicalCommand::StartStreaming,
        LogicalCommand::StopStreaming,
        LogicalCommand::UpdateCurrentTimestamp,
        LogicalCommand::GetMIModeEnabled,
        LogicalCommand::GetAxisDirection,
        LogicalCommand::GetFilterMode,
        LogicalCommand::GetEulerDecompositionOrder,
        LogicalCommand::SetEulerAngleDecompositionOrder,
        LogicalCommand::OffsetWithCurrentOrientation,
        LogicalCommand::TareWithCurrentOrientation,
        LogicalCommand::TareWithQuaternion,
        LogicalCommand::SetMIModeEnabled,
        LogicalCommand::BeginMIModeFieldCalibration,
        LogicalCommand::SetAxisDirections,
        LogicalCommand::BeginGyroAutoCalibration,
        LogicalCommand::SetCalibrationMode,
        LogicalCommand::GetCalibrationMode,
        LogicalCommand::GetFirmwareVersionString,
        LogicalCommand::RestoreFactorySettings,
        LogicalCommand::SoftwareReset,
    ];

    /// Returns this command's catalog entry.
    #[inline]
    pub const fn template(&self) -> WireTemplate {
        lookup(*self)
    }

    #[inline]
    pub const fn code(&self) -> u8 {
        lookup(*self).code
    }

    #[inline]
    pub const fn arity(&self) -> usize {
        lookup(*self).args.len()
    }

    #[inline]
    pub const fn response_shape(&self) -> ResponseShape {
        lookup(*self).response
    }

    /// Finds the command with the given wire code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|cmd| cmd.code() == code)
    }

    /// Whether the device accepts this command as a streaming slot.
    ///
    /// Streamable commands take no arguments and reply with float data.
    #[inline]
    pub const fn is_streamable(&self) -> bool {
        let template = lookup(*self);
        template.args.is_empty() && template.response.is_float_data()
    }

    /// Commands that reset the device's volatile configuration.
    #[inline]
    pub const fn resets_device(&self) -> bool {
        matches!(self, LogicalCommand::RestoreFactorySettings | LogicalCommand::SoftwareReset)
    }
}

impl fmt::Display for LogicalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(:{})", self, self.code())
    }
}

/// Looks up the catalog entry for `command`. Total over [`LogicalCommand`].
pub const fn lookup(command: LogicalCommand) -> WireTemplate {
    use LogicalCommand::*;
    use ResponseShape as R;

    let (code, args, response) = match command {
        GetTaredOrientationAsQuaternion => (0, NO_ARGS, R::Quaternion),
        GetTaredOrientationAsEulerAngles => (1, NO_ARGS, R::EulerAngles),
        GetTaredOrientationAsRotationMatrix => (2, NO_ARGS, R::FloatVector(9)),
        GetTaredOrientationAsAxisAngle => (3, NO_ARGS, R::FloatVector(4)),
        GetTaredOrientationAsTwoVector => (4, NO_ARGS, R::FloatVector(6)),
        GetDifferenceQuaternion => (5, NO_ARGS, R::Quaternion),
        GetUntaredOrientationAsQuaternion => (6, NO_ARGS, R::Quaternion),
        GetUntaredOrientationAsEulerAngles => (7, NO_ARGS, R::EulerAngles),
        GetUntaredOrientationAsRotationMatrix => (8, NO_ARGS, R::FloatVector(9)),
        GetUntaredOrientationAsAxisAngle => (9, NO_ARGS, R::FloatVector(4)),
        GetUntaredOrientationAsTwoVector => (10, NO_ARGS, R::FloatVector(6)),
        GetTaredTwoVectorInSensorFrame => (11, NO_ARGS, R::FloatVector(6)),
        GetUntaredTwoVectorInSensorFrame => (12, NO_ARGS, R::FloatVector(6)),

        SetEulerAngleDecompositionOrder => (16, ONE_INT, R::None),
        OffsetWithCurrentOrientation => (19, NO_ARGS, R::None),

        GetAllCorrectedComponentSensorData => (37, NO_ARGS, R::FloatVector(9)),
        GetCorrectedGyroRate => (38, NO_ARGS, R::FloatVector(3)),
        GetCorrectedAccelerometerVector => (39, NO_ARGS, R::FloatVector(3)),
        GetCorrectedCompassVector => (40, NO_ARGS, R::FloatVector(3)),
        GetCorrectedLinearAccelerationInGlobalSpace => (41, NO_ARGS, R::FloatVector(3)),
        GetTemperatureC => (43, NO_ARGS, R::Float),
        GetTemperatureF => (44, NO_ARGS, R::Float),
        GetConfidenceFactor => (45, NO_ARGS, R::Float),
        CorrectRawGyroData => (48, THREE_FLOATS, R::FloatVector(3)),
        CorrectRawAccelData => (49, THREE_FLOATS, R::FloatVector(3)),
        CorrectRawCompassData => (50, THREE_FLOATS, R::FloatVector(3)),

        GetAllRawComponentSensorData => (64, NO_ARGS, R::FloatVector(9)),
        GetRawGyroRate => (65, NO_ARGS, R::FloatVector(3)),
        GetRawAccelData => (66, NO_ARGS, R::FloatVector(3)),
        GetRawCompassData => (67, NO_ARGS, R::FloatVector(3)),

        SetStreamingSlots => (80, EIGHT_INTS, R::None),
        GetStreamingSlots => (81, NO_ARGS, R::IntegerVector(8)),
        SetStreamingTiming => (82, THREE_INTS, R::None),
        GetStreamingTiming => (83, NO_ARGS, R::IntegerVector(3)),
        GetStreamingBatch => (84, NO_ARGS, R::StreamingBatch),
        StartStreaming => (85, NO_ARGS, R::None),
        StopStreaming => (86, NO_ARGS, R::None),
        UpdateCurrentTimestamp => (95, ONE_INT, R::None),
        TareWithCurrentOrientation => (96, NO_ARGS, R::None),
        TareWithQuaternion => (97, FOUR_FLOATS, R::None),

        SetMIModeEnabled => (112, ONE_INT, R::None),
        BeginMIModeFieldCalibration => (114, NO_ARGS, R::None),
        SetAxisDirections => (116, ONE_INT, R::None),
        GetMIModeEnabled => (136, NO_ARGS, R::Integer),
        GetAxisDirection => (143, NO_ARGS, R::Integer),
        GetFilterMode => (152, NO_ARGS, R::Integer),
        GetEulerDecompositionOrder => (156, NO_ARGS, R::Integer),

        BeginGyroAutoCalibration => (165, NO_ARGS, R::None),
        SetCalibrationMode => (169, ONE_INT, R::None),
        GetCalibrationMode => (170, NO_ARGS, R::Integer),

        GetFirmwareVersionString => (223, NO_ARGS, R::Text),
        RestoreFactorySettings => (224, NO_ARGS, R::None),
        SoftwareReset => (226, NO_ARGS, R::None),
    };

    WireTemplate { code, args, response }
}
