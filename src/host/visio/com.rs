//! Late-bound `IDispatch` calls into the Visio object model.

use super::{OpenMode, VisioOptions};
use crate::error::{Error, Result};
use crate::host::{export_failed, export_path, HostSession};
use crate::model::Page;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use windows::core::{Interface, BSTR, GUID, HSTRING, IUnknown, PCWSTR, VARIANT};
use windows::Win32::System::Com::{
    CLSIDFromProgID, CoCreateInstance, CoInitializeEx, CoUninitialize, IDispatch,
    CLSCTX_LOCAL_SERVER, COINIT_APARTMENTTHREADED, DISPATCH_FLAGS, DISPATCH_METHOD,
    DISPATCH_PROPERTYGET, DISPPARAMS,
};

const LOCALE_USER_DEFAULT: u32 = 0x0400;

/// COM initialised on the current thread for as long as this value lives.
struct Apartment;

impl Apartment {
    fn enter() -> windows::core::Result<Self> {
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED).ok()? };
        Ok(Apartment)
    }
}

impl Drop for Apartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

/// An automation object addressed by member name.
struct Dispatch(IDispatch);

impl Dispatch {
    fn create(prog_id: &str) -> windows::core::Result<Self> {
        let prog_id = HSTRING::from(prog_id);
        unsafe {
            let clsid = CLSIDFromProgID(PCWSTR::from_raw(prog_id.as_ptr()))?;
            let dispatch: IDispatch = CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER)?;
            Ok(Dispatch(dispatch))
        }
    }

    fn from_variant(value: &VARIANT) -> windows::core::Result<Self> {
        let unknown = IUnknown::try_from(value)?;
        Ok(Dispatch(unknown.cast()?))
    }

    fn member_id(&self, name: &str) -> windows::core::Result<i32> {
        let wide = HSTRING::from(name);
        let names = [PCWSTR::from_raw(wide.as_ptr())];
        let mut id = 0;
        unsafe {
            self.0
                .GetIDsOfNames(&GUID::zeroed(), names.as_ptr(), 1, LOCALE_USER_DEFAULT, &mut id)?;
        }
        Ok(id)
    }

    fn has_member(&self, name: &str) -> bool {
        self.member_id(name).is_ok()
    }

    fn invoke(&self, name: &str, flags: DISPATCH_FLAGS, args: &[VARIANT]) -> windows::core::Result<VARIANT> {
        let id = self.member_id(name)?;
        // IDispatch takes positional arguments last-to-first
        let mut args: Vec<VARIANT> = args.iter().rev().cloned().collect();
        let params = DISPPARAMS {
            rgvarg: args.as_mut_ptr(),
            rgdispidNamedArgs: std::ptr::null_mut(),
            cArgs: args.len() as u32,
            cNamedArgs: 0,
        };
        let mut result = VARIANT::default();
        unsafe {
            self.0.Invoke(
                id,
                &GUID::zeroed(),
                LOCALE_USER_DEFAULT,
                flags,
                &params,
                Some(&mut result as *mut VARIANT),
                None,
                None,
            )?;
        }
        Ok(result)
    }

    fn get(&self, name: &str) -> windows::core::Result<VARIANT> {
        self.invoke(name, DISPATCH_PROPERTYGET, &[])
    }

    fn get_object(&self, name: &str) -> windows::core::Result<Dispatch> {
        Dispatch::from_variant(&self.get(name)?)
    }

    fn item(&self, index: i32) -> windows::core::Result<Dispatch> {
        let flags = DISPATCH_FLAGS(DISPATCH_METHOD.0 | DISPATCH_PROPERTYGET.0);
        Dispatch::from_variant(&self.invoke("Item", flags, &[VARIANT::from(index)])?)
    }

    fn call(&self, name: &str, args: &[VARIANT]) -> windows::core::Result<VARIANT> {
        self.invoke(name, DISPATCH_METHOD, args)
    }
}

/// `path` as a BSTR argument, carrying its UTF-16 units unchanged.
fn path_variant(path: &Path) -> windows::core::Result<VARIANT> {
    let wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    Ok(VARIANT::from(BSTR::from_wide(&wide)?))
}

pub(super) fn is_registered(prog_id: &str) -> bool {
    let Ok(_apartment) = Apartment::enter() else {
        return false;
    };
    let prog_id = HSTRING::from(prog_id);
    unsafe { CLSIDFromProgID(PCWSTR::from_raw(prog_id.as_ptr())).is_ok() }
}

/// A running Visio instance with one open document.
///
/// Quits Visio on [`HostSession::close`] or when dropped.
pub struct VisioSession {
    // Dropped in declaration order: COM objects before the apartment.
    document: Option<Dispatch>,
    app: Option<Dispatch>,
    _apartment: Apartment,
}

impl VisioSession {
    pub(super) fn launch(options: &VisioOptions, source: &Path, path: &Path) -> Result<Self> {
        let apartment =
            Apartment::enter().map_err(|e| Error::HostUnavailable(e.to_string()))?;
        let app = Dispatch::create(&options.prog_id)
            .map_err(|e| Error::HostUnavailable(format!("{}: {}", options.prog_id, e)))?;

        let opened = open_document(&app, path, options.open_mode);
        let mut session = VisioSession {
            document: None,
            app: Some(app),
            _apartment: apartment,
        };

        match opened {
            Ok(document) => {
                session.document = Some(document);
                Ok(session)
            }
            Err(e) => {
                session.close();
                Err(Error::SourceOpenFailed {
                    path: source.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn document(&self) -> Result<&Dispatch> {
        self.document
            .as_ref()
            .ok_or_else(|| Error::Unexpected("Visio session is already closed".into()))
    }
}

fn open_document(app: &Dispatch, path: &Path, mode: OpenMode) -> windows::core::Result<Dispatch> {
    let documents = app.get_object("Documents")?;
    let file_name = path_variant(path)?;

    let document = match mode.open_ex_flags() {
        Some(flags) if documents.has_member("OpenEx") => {
            log::debug!("Documents.OpenEx({}, {:#x})", path.display(), flags);
            documents.call("OpenEx", &[file_name, VARIANT::from(flags)])?
        }
        _ => {
            log::debug!("Documents.Open({})", path.display());
            documents.call("Open", &[file_name])?
        }
    };
    Dispatch::from_variant(&document)
}

impl HostSession for VisioSession {
    fn pages(&self) -> Result<Vec<Page>> {
        let unexpected = |e: windows::core::Error| Error::Unexpected(e.to_string());

        let pages = self.document()?.get_object("Pages").map_err(unexpected)?;
        let count = i32::try_from(&pages.get("Count").map_err(unexpected)?).map_err(unexpected)?;

        let mut result = Vec::with_capacity(count.max(0) as usize);
        for position in 1..=count {
            let page = pages.item(position).map_err(unexpected)?;
            let name = page
                .get("Name")
                .and_then(|v| BSTR::try_from(&v))
                .map(|name| name.to_string())
                .ok()
                .filter(|name| !name.is_empty());
            result.push(Page {
                position: position as usize,
                name,
            });
        }
        log::debug!("document has {} pages", result.len());
        Ok(result)
    }

    fn export(&mut self, page: &Page, destination: &Path) -> Result<()> {
        let path = export_path(page, destination)?;
        let failed = |e: windows::core::Error| export_failed(page, destination, e);

        let pages = self.document()?.get_object("Pages").map_err(failed)?;
        let target = pages.item(page.position as i32).map_err(failed)?;
        let file_name = path_variant(&path).map_err(failed)?;
        log::debug!("exporting {} to {}", page, path.display());
        target.call("Export", &[file_name]).map_err(failed)?;
        Ok(())
    }

    fn close(&mut self) {
        self.document = None;
        if let Some(app) = self.app.take() {
            log::info!("quitting Visio");
            if let Err(e) = app.call("Quit", &[]) {
                log::warn!("Visio did not quit cleanly: {}", e);
            }
        }
    }
}

impl Drop for VisioSession {
    fn drop(&mut self) {
        self.close();
    }
}
