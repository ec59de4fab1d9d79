//! Microphone capture and speaker playback via PortAudio.
//!
//! - Blocking I/O streams with int16 (paInt16) samples, driven from
//!   dedicated worker threads
//! - [`PortAudioOutput`] implements [`OutputContext`](crate::device::OutputContext)
//! - [`PortAudioMicrophone`] implements [`Microphone`](crate::device::Microphone)
//! - Links against the system `portaudio` library (see `build.rs`)
//!
//! # Example
//!
//! ```ignore
//! use vocalstudio_audio::portaudio;
//!
//! for d in portaudio::list_devices()? {
//!     println!("{}: {} (in={}, out={})", d.index, d.name,
//!              d.max_input_channels, d.max_output_channels);
//! }
//! ```

mod backend;
pub(crate) mod ffi;

pub use backend::{PortAudioMicrophone, PortAudioOutput, PortAudioOutputFactory};

use std::ffi::CStr;
use std::io;
use std::os::raw::{c_int, c_ulong, c_void};
use std::ptr;
use std::sync::OnceLock;

static INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Initializes PortAudio once per process.
fn initialize() -> io::Result<()> {
    let result = INIT.get_or_init(|| {
        let err = unsafe { ffi::Pa_Initialize() };
        if err == ffi::PA_NO_ERROR {
            Ok(())
        } else {
            Err(pa_error_string(err))
        }
    });
    result.clone().map_err(io::Error::other)
}

fn pa_error_string(code: ffi::PaError) -> String {
    unsafe {
        let ptr = ffi::Pa_GetErrorText(code);
        if ptr.is_null() {
            return format!("portaudio error {}", code);
        }
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

fn pa_check(code: ffi::PaError) -> io::Result<()> {
    match code {
        ffi::PA_NO_ERROR | ffi::PA_INPUT_OVERFLOWED | ffi::PA_OUTPUT_UNDERFLOWED => Ok(()),
        _ => Err(io::Error::other(pa_error_string(code))),
    }
}

/// Information about an audio device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub max_input_channels: u32,
    pub max_output_channels: u32,
    pub default_sample_rate: f64,
    pub is_default_input: bool,
    pub is_default_output: bool,
}

/// Lists available audio devices.
pub fn list_devices() -> io::Result<Vec<DeviceInfo>> {
    initialize()?;

    let count = unsafe { ffi::Pa_GetDeviceCount() };
    if count < 0 {
        return Err(io::Error::other(pa_error_string(count)));
    }

    let default_input = unsafe { ffi::Pa_GetDefaultInputDevice() };
    let default_output = unsafe { ffi::Pa_GetDefaultOutputDevice() };

    let mut devices = Vec::with_capacity(count as usize);
    for i in 0..count {
        let info = unsafe { ffi::Pa_GetDeviceInfo(i) };
        if info.is_null() {
            continue;
        }
        let info = unsafe { &*info };
        let name = unsafe { CStr::from_ptr(info.name) }
            .to_string_lossy()
            .into_owned();

        devices.push(DeviceInfo {
            index: i as usize,
            name,
            max_input_channels: info.max_input_channels as u32,
            max_output_channels: info.max_output_channels as u32,
            default_sample_rate: info.default_sample_rate,
            is_default_input: i == default_input,
            is_default_output: i == default_output,
        });
    }
    Ok(devices)
}

/// Direction of a blocking stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Input,
    Output,
}

/// A blocking PortAudio stream on the default device.
pub(crate) struct Stream {
    pa_stream: *mut c_void,
    direction: Direction,
    channels: usize,
    frames_per_buffer: usize,
    closed: bool,
}

// The raw stream pointer is only touched by the worker thread that owns it.
unsafe impl Send for Stream {}

impl Stream {
    /// Opens a stream on the default input or output device.
    pub(crate) fn open(
        direction: Direction,
        channels: u32,
        sample_rate: u32,
        frames_per_buffer: usize,
    ) -> io::Result<Self> {
        initialize()?;

        let device = unsafe {
            match direction {
                Direction::Input => ffi::Pa_GetDefaultInputDevice(),
                Direction::Output => ffi::Pa_GetDefaultOutputDevice(),
            }
        };
        if device == ffi::PA_NO_DEVICE {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no default device"));
        }
        let info = unsafe { ffi::Pa_GetDeviceInfo(device) };
        if info.is_null() {
            return Err(io::Error::other("failed to get device info"));
        }
        let latency = unsafe {
            match direction {
                Direction::Input => (*info).default_low_input_latency,
                Direction::Output => (*info).default_low_output_latency,
            }
        };

        let params = ffi::PaStreamParameters {
            device,
            channel_count: channels as c_int,
            sample_format: ffi::PA_INT16,
            suggested_latency: latency,
            host_api_specific_stream_info: ptr::null_mut(),
        };
        let (input, output): (*const ffi::PaStreamParameters, *const ffi::PaStreamParameters) =
            match direction {
                Direction::Input => (&params, ptr::null()),
                Direction::Output => (ptr::null(), &params),
            };

        let mut pa_stream: *mut c_void = ptr::null_mut();
        pa_check(unsafe {
            ffi::Pa_OpenStream(
                &mut pa_stream,
                input,
                output,
                sample_rate as f64,
                frames_per_buffer as c_ulong,
                ffi::PA_CLIP_OFF,
                ptr::null(),
                ptr::null_mut(),
            )
        })?;

        let mut stream = Stream {
            pa_stream,
            direction,
            channels: channels as usize,
            frames_per_buffer,
            closed: false,
        };
        pa_check(unsafe { ffi::Pa_StartStream(stream.pa_stream) }).inspect_err(|_| {
            stream.abort();
        })?;
        Ok(stream)
    }

    /// Reads one buffer of interleaved samples.
    pub(crate) fn read(&mut self) -> io::Result<Vec<i16>> {
        if self.closed || self.direction != Direction::Input {
            return Err(io::Error::other("stream not readable"));
        }
        let mut samples = vec![0i16; self.frames_per_buffer * self.channels];
        pa_check(unsafe {
            ffi::Pa_ReadStream(
                self.pa_stream,
                samples.as_mut_ptr() as *mut c_void,
                self.frames_per_buffer as c_ulong,
            )
        })?;
        Ok(samples)
    }

    /// Writes interleaved samples, blocking until the device accepts them.
    pub(crate) fn write(&mut self, samples: &[i16]) -> io::Result<()> {
        if self.closed || self.direction != Direction::Output {
            return Err(io::Error::other("stream not writable"));
        }
        let frames = samples.len() / self.channels;
        pa_check(unsafe {
            ffi::Pa_WriteStream(
                self.pa_stream,
                samples.as_ptr() as *const c_void,
                frames as c_ulong,
            )
        })
    }

    pub(crate) fn frames_per_buffer(&self) -> usize {
        self.frames_per_buffer
    }

    pub(crate) fn channels(&self) -> usize {
        self.channels
    }

    /// Drains pending output and closes the stream.
    pub(crate) fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        unsafe {
            ffi::Pa_StopStream(self.pa_stream);
            ffi::Pa_CloseStream(self.pa_stream);
        }
    }

    /// Discards pending output and closes the stream.
    pub(crate) fn abort(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        unsafe {
            ffi::Pa_AbortStream(self.pa_stream);
            ffi::Pa_CloseStream(self.pa_stream);
        }
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        self.abort();
    }
}
