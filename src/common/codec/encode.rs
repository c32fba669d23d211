// src/common/codec/encode.rs

use core::fmt::{self, Write};

use arrayvec::ArrayString;

use super::error::EncodeError;
use crate::common::command::{ArgKind, LogicalCommand};
use crate::common::types::Numeric;

/// Capacity of a formatted request, including the trailing newline.
pub const MAX_REQUEST_LEN: usize = 256;

/// A fully formatted request line: `:<code>[,<arg>]*\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    command: LogicalCommand,
    line: ArrayString<MAX_REQUEST_LEN>,
}

impl WireRequest {
    #[inline]
    pub fn command(&self) -> LogicalCommand {
        self.command
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.line.as_str()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.line.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.line.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }
}

impl fmt::Display for WireRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Without the newline, for logs
        f.write_str(self.line.trim_end_matches('\n'))
    }
}

/// Encodes `command` with `args` into its wire request.
///
/// Integers are written as plain decimals. Floats use the shortest decimal
/// representation that round-trips (`0.5`, `-1`, `0.0001`), never exponent
/// notation. An integer may fill a float parameter; a float may not fill an
/// integer one.
pub fn encode(command: LogicalCommand, args: &[Numeric]) -> Result<WireRequest, EncodeError> {
    let template = command.template();
    if args.len() != template.arity() {
        return Err(EncodeError::ArityMismatch {
            command,
            expected: template.arity(),
            got: args.len(),
        });
    }

    for (index, (kind, arg)) in template.args.iter().zip(args).enumerate() {
        let ok = match (kind, arg) {
            (ArgKind::Integer, Numeric::Integer(_)) => true,
            (ArgKind::Integer, Numeric::Float(_)) => false,
            (ArgKind::Float, Numeric::Integer(_)) => true,
            (ArgKind::Float, Numeric::Float(v)) => v.is_finite(),
        };
        if !ok {
            return Err(EncodeError::ArgumentType { command, index });
        }
    }

    let mut line = ArrayString::<MAX_REQUEST_LEN>::new();
    write_request(&mut line, template.code, args).map_err(|_| EncodeError::RequestTooLong)?;

    Ok(WireRequest { command, line })
}

fn write_request(out: &mut impl Write, code: u8, args: &[Numeric]) -> fmt::Result {
    write!(out, ":{}", code)?;
    for arg in args {
        match arg {
            Numeric::Integer(v) => write!(out, ",{}", v)?,
            Numeric::Float(v) => write!(out, ",{}", v)?,
        }
    }
    out.write_char('\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[u32]) -> heapless::Vec<Numeric, 8> {
        values.iter().map(|v| Numeric::Integer(*v)).collect()
    }

    #[test]
    fn test_request_formatting() {
        assert_eq!(
            encode(LogicalCommand::GetTaredOrientationAsQuaternion, &[]).unwrap().as_str(),
            ":0\n"
        );
        assert_eq!(encode(LogicalCommand::StartStreaming, &[]).unwrap().as_str(), ":85\n");
        assert_eq!(encode(LogicalCommand::StopStreaming, &[]).unwrap().as_str(), ":86\n");
        assert_eq!(
            encode(LogicalCommand::SetAxisDirections, &[Numeric::Integer(8)]).unwrap().as_str(),
            ":116,8\n"
        );
        assert_eq!(
            encode(LogicalCommand::SetStreamingTiming, &ints(&[100_000, 0, 0])).unwrap().as_str(),
            ":82,100000,0,0\n"
        );
        assert_eq!(
            encode(
                LogicalCommand::SetStreamingSlots,
                &ints(&[0, 38, 41, 255, 255, 255, 255, 255])
            )
            .unwrap()
            .as_str(),
            ":80,0,38,41,255,255,255,255,255\n"
        );
    }

    #[test]
    fn test_float_formatting_has_no_padding() {
        let req = encode(
            LogicalCommand::TareWithQuaternion,
            &[
                Numeric::Float(0.0),
                Numeric::Float(-0.5),
                Numeric::Float(0.25),
                Numeric::Float(1.0),
            ],
        )
        .unwrap();
        assert_eq!(req.as_str(), ":97,0,-0.5,0.25,1\n");

        // Integers may stand in for floats
        let req = encode(
            LogicalCommand::CorrectRawGyroData,
            &[Numeric::Integer(1), Numeric::Float(0.001), Numeric::Integer(3)],
        )
        .unwrap();
        assert_eq!(req.as_str(), ":48,1,0.001,3\n");
    }

    #[test]
    fn test_request_always_ends_with_single_newline() {
        for cmd in LogicalCommand::ALL {
            let args: heapless::Vec<Numeric, 8> =
                (0..cmd.arity()).map(|_| Numeric::Integer(1)).collect();
            let req = encode(cmd, &args).unwrap();
            assert!(req.as_str().starts_with(':'));
            assert!(req.as_str().ends_with('\n'));
            assert!(!req.as_str()[..req.len() - 1].contains('\n'));
            assert_eq!(req.command(), cmd);
        }
    }

    #[test]
    fn test_arity_mismatch_iff_wrong_count() {
        for cmd in LogicalCommand::ALL {
            for n in 0..=8usize {
                let args: heapless::Vec<Numeric, 8> = (0..n).map(|_| Numeric::Integer(0)).collect();
                let result = encode(cmd, &args);
                if n == cmd.arity() {
                    assert!(result.is_ok(), "{:?} with {} args", cmd, n);
                } else {
                    assert_eq!(
                        result,
                        Err(EncodeError::ArityMismatch { command: cmd, expected: cmd.arity(), got: n })
                    );
                }
            }
        }
    }

    #[test]
    fn test_argument_kind_errors() {
        assert_eq!(
            encode(LogicalCommand::SetMIModeEnabled, &[Numeric::Float(1.0)]),
            Err(EncodeError::ArgumentType { command: LogicalCommand::SetMIModeEnabled, index: 0 })
        );
        assert_eq!(
            encode(
                LogicalCommand::TareWithQuaternion,
                &[
                    Numeric::Float(0.0),
                    Numeric::Float(f32::NAN),
                    Numeric::Float(0.0),
                    Numeric::Float(1.0)
                ]
            ),
            Err(EncodeError::ArgumentType { command: LogicalCommand::TareWithQuaternion, index: 1 })
        );
    }

    #[test]
    fn test_display_omits_newline() {
        let req = encode(LogicalCommand::SetMIModeEnabled, &[Numeric::Integer(1)]).unwrap();
        assert_eq!(req.to_string(), ":112,1");
    }
}
