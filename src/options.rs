//! Catalog of known OSC option names.

/// All Google OSC options as of January 2021 (58 names), in the order the
/// probe tool scans them, with the vendor extension slot last.
pub const OPTION_CATALOG: &[&str] = &[
    "captureMode",
    "captureModeSupport",
    "captureStatus",
    "captureStatusSupport",
    "exposureProgram",
    "exposureProgramSupport",
    "iso",
    "isoSupport",
    "shutterSpeed",
    "shutterSpeedSupport",
    "aperture",
    "apertureSupport",
    "whiteBalance",
    "whiteBalanceSupport",
    "exposureCompensation",
    "exposureCompensationSupport",
    "fileFormat",
    "fileFormatSupport",
    "exposureDelay",
    "exposureDelaySupport",
    "sleepDelay",
    "sleepDelaySupport",
    "offDelay",
    "offDelaySupport",
    "totalSpace",
    "remainingSpace",
    "remainingPictures",
    "gpsInfo",
    "dateTimeZone",
    "hdr",
    "hdrSupport",
    "exposureBracket",
    "exposureBracketSupport",
    "gyro",
    "gyroSupport",
    "gps",
    "gpsSupport",
    "imageStabilization",
    "imageStabilizationSupport",
    "wifiPassword",
    "previewFormat",
    "previewFormatSupport",
    "captureInterval",
    "captureIntervalSupport",
    "captureNumber",
    "captureNumberSupport",
    "remainingVideoSeconds",
    "pollingDelay",
    "delayProcessing",
    "delayProcessingSupport",
    "clientVersion",
    "photoStitchingSupport",
    "photoStitching",
    "videoStitchingSupport",
    "videoStitching",
    "videoGPSSupport",
    "videoGPS",
    "_vendorSpecific",
];
