use httpload::error::AppResult;

fn main() -> AppResult<()> {
    httpload::entry::run()
}
