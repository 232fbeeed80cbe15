pub mod filler;
pub mod keywords;

pub use filler::{count_fillers, FillerCount, FillerMatching, FILLERS};
pub use keywords::{
    detect_age, detect_family, detect_flow, detect_fun_fact, detect_goal, detect_hobbies,
    detect_name, detect_salutation_and_closing, detect_school_class, Detections, FlowFindings,
    KeywordFindings, SalutationClosing, SchoolClassFindings,
};
