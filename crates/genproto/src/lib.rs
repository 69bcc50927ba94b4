pub mod comment {
    tonic::include_proto!("comment");
}
