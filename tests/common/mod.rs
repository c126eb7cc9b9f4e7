//! Common test utilities for feature-placement tests

pub mod fixtures;
pub mod mock_services;
pub mod recording_map;

// Re-exports for convenience - not all test binaries use all exports
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_services::{
    StubFeatureEndpoint, StubGeocoder, StubGeolocator, StubResponse, StubReverseGeocoder,
    StubSubForms, stub_services,
};
#[allow(unused_imports)]
pub use recording_map::{MapCall, RecordingMap, RecordingStreetView, StreetViewCall};
