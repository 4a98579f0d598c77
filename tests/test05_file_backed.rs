#![cfg(feature = "sqlite")]

use std::time::Duration;

use sql_session::prelude::*;
use tempfile::tempdir;

#[tokio::test]
async fn file_database_persists_across_connections() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("persist.db").to_string_lossy().into_owned();

    let writer = ConnectOptions::builder()
        .db_path(path.clone())
        .wal(false)
        .busy_timeout(Duration::from_millis(500))
        .connect()
        .await?;
    writer
        .scoped(|db| async move {
            db.execute_batch("create table kept (v text); insert into kept values ('hello');")
                .await
        })
        .await?;
    assert!(writer.is_closed());

    let reader = ConnectOptions::builder()
        .db_path(path.clone())
        .read_only(true)
        .connect()
        .await?;
    let table = reader.execute("select v from kept").await?.to_table()?;
    assert_eq!(table.row(0), Some(vec![Value::Text("hello".into())]));

    // read-only handles reject writes as statement errors
    let err = reader.execute("insert into kept values ('nope')").await.unwrap_err();
    assert!(matches!(err, SqlSessionError::Statement(_)), "{err}");
    Ok(())
}

#[tokio::test]
async fn dropping_last_clone_releases_file_handle() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("drop.db").to_string_lossy().into_owned();

    {
        let conn = connect_with(ConnectOptions::file(path.clone())).await?;
        conn.execute("create table d (a int)").await?;
        conn.execute("insert into d values (42)").await?;
    }

    let conn = connect_with(ConnectOptions::file(path)).await?;
    let table = conn.execute("select a from d").await?.to_table()?;
    assert_eq!(table.row(0), Some(vec![Value::Int(42)]));
    Ok(())
}
