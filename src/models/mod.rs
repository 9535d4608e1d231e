pub mod area_of_law;
pub mod timeline;

pub use area_of_law::AreaOfLaw;
pub use timeline::{
    CreateTimelineRequest, CreateTimelineResponse, FileResponse, NewFile, TimelineWithFiles,
};
