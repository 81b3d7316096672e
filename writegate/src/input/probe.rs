//! Input availability probe.
//!
//! Asks the kernel how many bytes are buffered on stdin. Any non-negative
//! answer means a source is attached; an error (closed descriptor, `/dev/null`
//! and other devices that do not support the query) means there is nothing to
//! prompt. The answer says nothing about whether data will ever arrive, so
//! the session still bounds end-of-file retries.

/// Returns `true` when stdin looks like it is attached to something readable.
pub fn stdin_has_source() -> bool {
    #[cfg(unix)]
    {
        fd_has_source(libc::STDIN_FILENO)
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Returns `true` when `FIONREAD` succeeds on `fd` with a non-negative count.
#[cfg(unix)]
pub fn fd_has_source(fd: std::os::unix::io::RawFd) -> bool {
    let mut pending: libc::c_int = 0;
    // SAFETY: FIONREAD writes one c_int through the pointer, which is valid
    // for the duration of the call. Invalid descriptors yield -1/EBADF.
    let rc = unsafe { libc::ioctl(fd, libc::FIONREAD, &mut pending as *mut libc::c_int) };
    rc == 0 && pending >= 0
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::io::AsRawFd;
    use std::os::unix::net::UnixStream;

    #[test]
    fn connected_socket_reports_a_source_with_or_without_data() {
        let (mut writer, reader) = UnixStream::pair().unwrap();
        assert!(fd_has_source(reader.as_raw_fd()));
        writer.write_all(b"y\n").unwrap();
        assert!(fd_has_source(reader.as_raw_fd()));
    }

    #[test]
    fn invalid_descriptor_reports_no_source() {
        assert!(!fd_has_source(-1));
    }
}
