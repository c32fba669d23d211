// src/driver/mod.rs

//! High-level device operations and the configure-then-stream run loop.

mod config;
mod sample;

pub use config::DriverConfig;
pub use sample::{ImuSample, STANDARD_GRAVITY};

use crate::common::{
    command::LogicalCommand,
    error::ImuError,
    hal_traits::{ImuInstant, ImuSerial, ImuTimer},
    types::{AxisDirections, CalibrationMode, DecodedValue, EulerDecompositionOrder, Numeric, Quaternion, Text},
};
use crate::session::{ImuPublisher, ImuSession, StreamStats};
use core::fmt::Debug;
use log::{debug, info};

/// A YostLab 3-Space IMU on a serial link.
#[derive(Debug)]
pub struct ImuDriver<IF>
where
    IF: ImuSerial + ImuTimer,
    IF::Error: Debug,
    IF::Instant: ImuInstant,
{
    session: ImuSession<IF>,
    config: DriverConfig,
}

impl<IF> ImuDriver<IF>
where
    IF: ImuSerial + ImuTimer,
    IF::Error: Debug,
    IF::Instant: ImuInstant,
{
    pub fn new(interface: IF, config: DriverConfig) -> Self {
        ImuDriver {
            session: ImuSession::with_config(interface, config.session),
            config,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn session(&self) -> &ImuSession<IF> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ImuSession<IF> {
        &mut self.session
    }

    pub fn release(self) -> IF {
        self.session.release()
    }

    // --- Queries ---

    /// Firmware version string (`:223`).
    pub fn software_version(&mut self) -> Result<Text, ImuError<IF::Error>> {
        let cmd = LogicalCommand::GetFirmwareVersionString;
        match self.session.query(cmd, &[])? {
            DecodedValue::Text(version) => Ok(version),
            other => Err(ImuError::MalformedResponse {
                expected: 1,
                got: other.field_count(),
            }),
        }
    }

    pub fn axis_direction(&mut self) -> Result<AxisDirections, ImuError<IF::Error>> {
        self.query_setting(LogicalCommand::GetAxisDirection, AxisDirections::from_code)
    }

    pub fn euler_decomposition(&mut self) -> Result<EulerDecompositionOrder, ImuError<IF::Error>> {
        self.query_setting(LogicalCommand::GetEulerDecompositionOrder, EulerDecompositionOrder::from_code)
    }

    pub fn calibration_mode(&mut self) -> Result<CalibrationMode, ImuError<IF::Error>> {
        self.query_setting(LogicalCommand::GetCalibrationMode, CalibrationMode::from_code)
    }

    /// Whether magnetic-interference mode is enabled (`:136`).
    pub fn mi_mode(&mut self) -> Result<bool, ImuError<IF::Error>> {
        self.query_setting(LogicalCommand::GetMIModeEnabled, |v| match v {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        })
    }

    fn query_setting<T>(
        &mut self,
        cmd: LogicalCommand,
        convert: impl FnOnce(u32) -> Option<T>,
    ) -> Result<T, ImuError<IF::Error>> {
        let value = self.session.query(cmd, &[])?;
        let code = value.as_integer().ok_or(ImuError::<IF::Error>::MalformedResponse {
            expected: 1,
            got: value.field_count(),
        })?;
        convert(code).ok_or(ImuError::UnexpectedValue { command: cmd, value: code })
    }

    // --- Settings and actions ---

    pub fn set_axis_directions(&mut self, axes: AxisDirections) -> Result<(), ImuError<IF::Error>> {
        self.write(LogicalCommand::SetAxisDirections, &[Numeric::Integer(axes.code())])
    }

    pub fn set_euler_decomposition(&mut self, order: EulerDecompositionOrder) -> Result<(), ImuError<IF::Error>> {
        self.write(LogicalCommand::SetEulerAngleDecompositionOrder, &[Numeric::Integer(order.code())])
    }

    pub fn set_calibration_mode(&mut self, mode: CalibrationMode) -> Result<(), ImuError<IF::Error>> {
        self.write(LogicalCommand::SetCalibrationMode, &[Numeric::Integer(mode.code())])
    }

    pub fn set_mi_mode(&mut self, on: bool) -> Result<(), ImuError<IF::Error>> {
        self.write(LogicalCommand::SetMIModeEnabled, &[Numeric::Integer(on as u32)])
    }

    /// Starts gyro auto-calibration and waits out the settle time.
    ///
    /// The sensor must be held still until this returns.
    pub fn start_gyro_calibration(&mut self) -> Result<(), ImuError<IF::Error>> {
        self.write(LogicalCommand::BeginGyroAutoCalibration, &[])?;
        let settle_ms = u32::try_from(self.config.gyro_calibration_settle.as_millis()).unwrap_or(u32::MAX);
        debug!("gyro calibration started, settling for {} ms", settle_ms);
        self.session.interface_mut().delay_ms(settle_ms);
        Ok(())
    }

    pub fn tare(&mut self) -> Result<(), ImuError<IF::Error>> {
        self.write(LogicalCommand::TareWithCurrentOrientation, &[])
    }

    pub fn tare_with_quaternion(&mut self, q: Quaternion) -> Result<(), ImuError<IF::Error>> {
        let [x, y, z, w] = q.to_array();
        self.write(
            LogicalCommand::TareWithQuaternion,
            &[x.into(), y.into(), z.into(), w.into()],
        )
    }

    /// Restores factory settings. Streaming must be reconfigured afterwards.
    pub fn restore_factory_settings(&mut self) -> Result<(), ImuError<IF::Error>> {
        self.write(LogicalCommand::RestoreFactorySettings, &[])
    }

    pub fn software_reset(&mut self) -> Result<(), ImuError<IF::Error>> {
        self.write(LogicalCommand::SoftwareReset, &[])
    }

    fn write(&mut self, cmd: LogicalCommand, args: &[Numeric]) -> Result<(), ImuError<IF::Error>> {
        self.session.execute(cmd, args)?;
        Ok(())
    }

    // --- Bring-up and streaming ---

    /// Stops any running stream, applies the configured settings, logs the
    /// device's state and starts streaming.
    pub fn bring_up(&mut self) -> Result<(), ImuError<IF::Error>> {
        self.session.stop_streaming()?;

        if self.config.calibrate_gyro_on_start {
            self.start_gyro_calibration()?;
        }
        if let Some(axes) = self.config.axis_directions {
            self.set_axis_directions(axes)?;
        }
        if let Some(on) = self.config.mi_mode {
            self.set_mi_mode(on)?;
        }

        let version = self.software_version()?;
        info!("firmware version: {}", version);
        let axes = self.axis_direction()?;
        info!("axis directions: {}", axes.code());
        let order = self.euler_decomposition()?;
        info!("euler decomposition order: {}", order);
        let mode = self.calibration_mode()?;
        info!("calibration mode: {:?}", mode);
        let mi = self.mi_mode()?;
        info!("MI mode enabled: {}", mi);

        let slots = self.config.slots;
        let timing = self.config.timing;
        self.session.set_streaming_slots(&slots)?;
        self.session.set_streaming_timing(&timing)?;
        if self.config.tare_on_start {
            self.tare()?;
        }
        self.session.start_streaming()?;
        info!("streaming slots {} every {} us", slots, timing.interval_us);
        Ok(())
    }

    /// Brings the device up and publishes frames until `should_stop` returns
    /// true. Streaming is stopped on the way out, even after an error.
    pub fn run<P, S>(&mut self, publisher: &mut P, should_stop: S) -> Result<StreamStats, ImuError<IF::Error>>
    where
        P: ImuPublisher<IF::Instant>,
        S: FnMut() -> bool,
    {
        self.bring_up()?;
        let streamed = self.session.stream(publisher, should_stop);
        let stopped = self.session.stop_streaming();
        let stats = streamed?;
        stopped?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::slots::StreamingSlots;
    use crate::session::mock::{MockInterface, RecordingPublisher};
    use core::time::Duration;

    fn device_with_settings() -> MockInterface {
        let mut iface = MockInterface::new();
        iface
            .reply_to(":223\n", b"21Nov2023A00\r\n")
            .reply_to(":143\n", b"8\r\n")
            .reply_to(":156\n", b"3\r\n")
            .reply_to(":170\n", b"1\r\n")
            .reply_to(":136\n", b"0\r\n");
        iface
    }

    fn driver(iface: MockInterface) -> ImuDriver<MockInterface> {
        ImuDriver::new(iface, DriverConfig::default())
    }

    #[test]
    fn test_typed_queries() {
        let mut d = driver(device_with_settings());
        assert_eq!(d.software_version().unwrap().as_str(), "21Nov2023A00");
        assert_eq!(d.axis_direction().unwrap(), AxisDirections::ENU);
        assert_eq!(d.euler_decomposition().unwrap(), EulerDecompositionOrder::Zyx);
        assert_eq!(d.calibration_mode().unwrap(), CalibrationMode::ScaleBias);
        assert!(!d.mi_mode().unwrap());
    }

    #[test]
    fn test_unknown_setting_value() {
        let mut iface = MockInterface::new();
        iface.reply_to(":170\n", b"7\n");
        let mut d = driver(iface);
        assert!(matches!(
            d.calibration_mode(),
            Err(ImuError::UnexpectedValue { command: LogicalCommand::GetCalibrationMode, value: 7 })
        ));
        assert!(d.session().state().is_idle());
    }

    #[test]
    fn test_setters_write_requests() {
        let mut d = driver(MockInterface::new());
        d.set_mi_mode(true).unwrap();
        d.set_axis_directions(AxisDirections::DEFAULT).unwrap();
        d.set_euler_decomposition(EulerDecompositionOrder::Yxz).unwrap();
        d.set_calibration_mode(CalibrationMode::Bias).unwrap();
        d.tare_with_quaternion(Quaternion::IDENTITY).unwrap();
        d.restore_factory_settings().unwrap();
        assert_eq!(
            d.session().interface().requests(),
            vec![":112,1", ":116,5", ":16,5", ":169,0", ":97,0,0,0,1", ":224"]
        );
    }

    #[test]
    fn test_gyro_calibration_waits_settle_time() {
        let mut d = driver(MockInterface::new());
        d.start_gyro_calibration().unwrap();
        assert_eq!(d.session().interface().requests(), vec![":165"]);
        assert_eq!(d.session().interface().now_us, 3_000_000);
    }

    #[test]
    fn test_bring_up_sequence() {
        let mut d = driver(device_with_settings());
        d.bring_up().unwrap();
        assert_eq!(
            d.session().interface().requests(),
            vec![
                ":86",
                ":165",
                ":116,8",
                ":223",
                ":143",
                ":156",
                ":170",
                ":136",
                ":80,0,38,41,255,255,255,255,255",
                ":82,100000,0,0",
                ":85",
            ]
        );
        assert!(d.session().state().is_streaming());
    }

    #[test]
    fn test_bring_up_with_optional_steps() {
        let config = DriverConfig {
            calibrate_gyro_on_start: false,
            axis_directions: None,
            mi_mode: Some(true),
            tare_on_start: true,
            ..DriverConfig::default()
        }
        .with_slots(StreamingSlots::EULER);
        let mut d = ImuDriver::new(device_with_settings(), config);
        d.bring_up().unwrap();

        let requests = d.session().interface().requests();
        assert_eq!(requests[..2], [":86", ":112,1"]);
        assert_eq!(requests[requests.len() - 4..], [":80,1,255,255,255,255,255,255,255", ":82,100000,0,0", ":96", ":85"]);
    }

    #[test]
    fn test_run_publishes_and_stops_streaming() {
        let mut iface = device_with_settings();
        iface.reply_to(":85\n", b"0,0,0,1,0,0,0,0,0,1\n0,0,0,1,0,0,0,0,0,1\n0,0,0,1,0,0,0,0,0,1\n");
        let mut d = driver(iface);
        let mut publisher = RecordingPublisher::default();

        let mut frames_left = 2;
        let stats = d
            .run(&mut publisher, || {
                if frames_left == 0 {
                    return true;
                }
                frames_left -= 1;
                false
            })
            .unwrap();

        assert_eq!(stats.frames, 2);
        assert_eq!(publisher.readings.len(), 2);
        let sample = ImuSample::from_record(&publisher.readings[0].0);
        assert_eq!(sample.linear_acceleration, Some([0.0, 0.0, STANDARD_GRAVITY]));

        assert_eq!(d.session().interface().requests().last(), Some(&":86"));
        assert!(d.session().state().is_idle());
        // Leftover frame was discarded with the stop
        assert!(d.session().interface().rx.is_empty());
    }

    #[test]
    fn test_run_stops_streaming_after_timeout() {
        let mut iface = device_with_settings();
        iface.reply_to(":85\n", b"0,0,0,1,0,0,0,0,0,1\n");
        let config = DriverConfig {
            gyro_calibration_settle: Duration::from_millis(10),
            ..DriverConfig::default()
        };
        let mut d = ImuDriver::new(iface, config);
        let mut publisher = RecordingPublisher::default();

        let result = d.run(&mut publisher, || false);
        assert!(matches!(result, Err(ImuError::Timeout)));
        assert_eq!(publisher.readings.len(), 1);
        assert_eq!(d.session().interface().requests().last(), Some(&":86"));
        assert!(d.session().state().is_idle());
    }
}
