mod partial_success ;
mod result_list ;

pub use partial_success::PartialSuccess ;
pub(crate) use result_list::ResultList ;
