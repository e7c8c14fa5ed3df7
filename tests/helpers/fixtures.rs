use super::TestApp;
use std::path::PathBuf;

pub async fn seed_tenant(app: &TestApp, id: i64, name: &str, domain: &str, path: &str) {
    sqlx::query("INSERT INTO tenants (id, name, domain, path) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(domain)
        .bind(path)
        .execute(app.pool())
        .await
        .expect("Failed to insert tenant");
}

pub struct AttachmentFixture<'a> {
    pub id: i64,
    pub tenant_id: i64,
    pub mime_type: &'a str,
    pub uploaded_at: &'a str,
    pub attached_file: Option<&'a str>,
    pub guid: Option<&'a str>,
}

pub async fn seed_attachment(app: &TestApp, fixture: AttachmentFixture<'_>) {
    sqlx::query(
        "INSERT INTO posts (id, tenant_id, post_type, title, mime_type, uploaded_at, attached_file, guid)
         VALUES (?, ?, 'attachment', ?, ?, ?, ?, ?)",
    )
    .bind(fixture.id)
    .bind(fixture.tenant_id)
    .bind(format!("attachment {}", fixture.id))
    .bind(fixture.mime_type)
    .bind(fixture.uploaded_at)
    .bind(fixture.attached_file)
    .bind(fixture.guid)
    .execute(app.pool())
    .await
    .expect("Failed to insert attachment");
}

/// Write a file of `size` bytes into a tenant's upload directory.
pub fn write_upload(app: &TestApp, tenant_id: i64, relative: &str, size: usize) -> PathBuf {
    let mut path = app.uploads_dir().to_path_buf();
    if tenant_id != 1 {
        path.push("sites");
        path.push(tenant_id.to_string());
    }
    path.push(relative);
    std::fs::create_dir_all(path.parent().expect("upload path has a parent"))
        .expect("Failed to create upload directory");
    std::fs::write(&path, vec![b'%'; size]).expect("Failed to write upload");
    path
}
