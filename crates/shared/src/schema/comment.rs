use sea_query::Iden;

#[derive(Iden)]
pub enum Comments {
    Table,
    Id,
    VideoId,
    Content,
    CreatedAt,
    UpdatedAt,
}
