mod catalog;
mod download;
mod lenient;
mod queue;
mod repeat;
mod track;

pub use catalog::{AlbumSummary, ArtistSummary, PlaylistDetail, PlaylistSummary};
pub use download::DownloadedTrack;
pub use queue::QueueEntry;
pub use repeat::RepeatMode;
pub use track::{AlbumRef, ArtistRef, MediaLink, Track, TrackArtists};
